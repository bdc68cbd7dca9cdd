// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Profile reads and updates.
//!
//! Two update paths with different powers:
//!
//! - **Self update**: an account edits its own profile. Any `role` field
//!   in the request is discarded, and an empty password means "keep the
//!   current one".
//! - **Admin update**: an administrator edits any account, role included.
//!
//! Both return the stored state; the self path also issues a replacement
//! token so the client never holds claims that disagree with the store.

use std::net::IpAddr;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use shelf_core::password::PasswordHasher;
use shelf_core::role::Role;
use shelf_core::types::{User, Username};
use shelf_core::{AuditLog, AuditLogger, SensitiveValue};
use shelf_store::{UserStore, UserUpdate};

use super::{hash_password, record};
use crate::auth::{AuthContext, JwtManager};
use crate::error::{ApiError, ApiResult};

// =============================================================================
// Requests
// =============================================================================

/// Self-service profile update body.
///
/// All fields optional; absent fields keep their stored value. A `role`
/// field is accepted for wire compatibility but never applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelfUpdateRequest {
    /// New first name.
    pub first_name: Option<String>,
    /// New last name.
    pub last_name: Option<String>,
    /// New country.
    pub country: Option<String>,
    /// New password; empty or absent keeps the current one. Masked in
    /// `Debug` output.
    pub password: Option<SensitiveValue<String>>,
    /// Ignored. Accounts cannot change their own role.
    #[serde(default)]
    pub role: Option<String>,
}

/// Administrative account update body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminUpdateRequest {
    /// New first name.
    pub first_name: Option<String>,
    /// New last name.
    pub last_name: Option<String>,
    /// New country.
    pub country: Option<String>,
    /// New password; empty or absent keeps the current one. Masked in
    /// `Debug` output.
    pub password: Option<SensitiveValue<String>>,
    /// New role name.
    pub role: Option<String>,
}

// =============================================================================
// UserService
// =============================================================================

/// Account profile operations.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    jwt: JwtManager,
    audit: Arc<dyn AuditLogger>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
        jwt: JwtManager,
        audit: Arc<dyn AuditLogger>,
    ) -> Self {
        Self {
            users,
            hasher,
            jwt,
            audit,
        }
    }

    /// Fetches an account by username.
    pub async fn get(&self, username: &Username) -> ApiResult<User> {
        self.users
            .get(username)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("user '{username}'")))
    }

    /// Lists all accounts.
    pub async fn list(&self) -> ApiResult<Vec<User>> {
        Ok(self.users.list().await?)
    }

    /// Applies a self-service update and issues a replacement token.
    ///
    /// The target is always the caller; a role in the request is dropped
    /// on the floor (logged, not an error, to keep old clients working).
    pub async fn self_update(
        &self,
        ctx: &AuthContext,
        req: SelfUpdateRequest,
    ) -> ApiResult<(User, String)> {
        if req.role.is_some() {
            warn!(
                username = %ctx.username,
                "role field in self update ignored"
            );
        }

        let update = UserUpdate {
            password_hash: self.hash_if_set(req.password).await?,
            role: None,
            first_name: req.first_name,
            last_name: req.last_name,
            country: req.country,
        };

        let user = if update.is_empty() {
            debug!(username = %ctx.username, "self update changed nothing");
            self.get(&ctx.username).await?
        } else {
            self.users.update(&ctx.username, update).await?
        };

        // Fresh token from stored state, so claims can never go stale.
        let token = self.jwt.issue(user.username.as_str(), user.role)?;

        info!(username = %user.username, "profile updated");
        record(
            self.audit.as_ref(),
            AuditLog::user_updated(user.username.as_str(), ctx.username.as_str(), ctx.client_ip),
        )
        .await;

        Ok((user, token))
    }

    /// Applies an administrative update to any account.
    pub async fn admin_update(
        &self,
        ctx: &AuthContext,
        target: &Username,
        req: AdminUpdateRequest,
    ) -> ApiResult<User> {
        let new_role = match req.role.as_deref() {
            Some(name) if !name.trim().is_empty() => Some(Role::parse(name)?),
            _ => None,
        };

        // Read the old role first so the audit entry can show the change.
        let before = self.get(target).await?;

        let update = UserUpdate {
            password_hash: self.hash_if_set(req.password).await?,
            role: new_role,
            first_name: req.first_name,
            last_name: req.last_name,
            country: req.country,
        };

        let user = if update.is_empty() {
            before.clone()
        } else {
            self.users.update(target, update).await?
        };

        info!(
            username = %user.username,
            actor = %ctx.username,
            "account updated by administrator"
        );
        record(
            self.audit.as_ref(),
            AuditLog::user_updated(user.username.as_str(), ctx.username.as_str(), ctx.client_ip),
        )
        .await;

        if let Some(role) = new_role {
            if role != before.role {
                record(
                    self.audit.as_ref(),
                    AuditLog::role_changed(
                        user.username.as_str(),
                        before.role,
                        role,
                        ctx.username.as_str(),
                        ctx.client_ip,
                    ),
                )
                .await;
            }
        }

        Ok(user)
    }

    /// Deletes an account.
    ///
    /// Deleting an absent account is a 404, not a silent success.
    pub async fn delete(&self, ctx: &AuthContext, target: &Username) -> ApiResult<()> {
        self.users.delete(target).await?;

        info!(username = %target, actor = %ctx.username, "account deleted");
        record(
            self.audit.as_ref(),
            AuditLog::user_deleted(target.as_str(), ctx.username.as_str(), ctx.client_ip),
        )
        .await;

        Ok(())
    }

    /// Returns the configured token lifetime in seconds.
    pub fn token_lifetime_secs(&self) -> i64 {
        self.jwt.expiration_secs()
    }

    /// Hashes a new password if one was actually supplied.
    ///
    /// `None` and the empty string both mean "no change"; HTML forms
    /// submit empty password fields when the user leaves them blank.
    async fn hash_if_set(
        &self,
        password: Option<SensitiveValue<String>>,
    ) -> ApiResult<Option<String>> {
        match password {
            Some(p) if !p.inner().is_empty() => {
                Ok(Some(hash_password(self.hasher.clone(), p.into_inner()).await?))
            }
            _ => Ok(None),
        }
    }
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("store", &self.users.name())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Claims;
    use shelf_core::password::Argon2Hasher;
    use shelf_core::types::ProfileFields;
    use shelf_core::{AuditAction, InMemoryAuditLogger};
    use shelf_store::{MemoryStore, NewUser};

    struct Fixture {
        service: UserService,
        store: Arc<MemoryStore>,
        audit: Arc<InMemoryAuditLogger>,
        hasher: Arc<Argon2Hasher>,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let audit = Arc::new(InMemoryAuditLogger::new());
        let hasher = Arc::new(Argon2Hasher::new());

        let hash = hasher.hash("wonderland").unwrap();
        store
            .create(
                NewUser::new(Username::new("alice"), hash, Role::User).with_profile(
                    ProfileFields {
                        first_name: "Alice".to_string(),
                        last_name: "Liddell".to_string(),
                        country: "GB".to_string(),
                    },
                ),
            )
            .await
            .unwrap();

        let service = UserService::new(
            store.clone(),
            hasher.clone(),
            JwtManager::new("test-secret-key-that-is-long-enough!!", "shelf", 3600).unwrap(),
            audit.clone(),
        );
        Fixture {
            service,
            store,
            audit,
            hasher,
        }
    }

    fn ctx_for(username: &str, role: Role) -> AuthContext {
        AuthContext::from_claims(&Claims::new(username, role, 3600, "shelf"))
    }

    #[tokio::test]
    async fn test_get_and_list() {
        let f = fixture().await;

        let user = f.service.get(&Username::new("alice")).await.unwrap();
        assert_eq!(user.first_name, "Alice");

        let err = f.service.get(&Username::new("ghost")).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));

        assert_eq!(f.service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_self_update_discards_role() {
        let f = fixture().await;
        let ctx = ctx_for("alice", Role::User);

        let req = SelfUpdateRequest {
            country: Some("NL".to_string()),
            role: Some("ADMIN".to_string()),
            ..Default::default()
        };
        let (user, token) = f.service.self_update(&ctx, req).await.unwrap();

        assert_eq!(user.country, "NL");
        assert_eq!(user.role, Role::User);
        assert!(!token.is_empty());

        let stored = f.store.get(&Username::new("alice")).await.unwrap().unwrap();
        assert_eq!(stored.role, Role::User);
    }

    #[tokio::test]
    async fn test_self_update_empty_password_keeps_hash() {
        let f = fixture().await;
        let ctx = ctx_for("alice", Role::User);
        let before = f.store.get(&ctx.username).await.unwrap().unwrap();

        let req = SelfUpdateRequest {
            first_name: Some("Alicia".to_string()),
            password: Some(SensitiveValue::new(String::new())),
            ..Default::default()
        };
        let (user, _) = f.service.self_update(&ctx, req).await.unwrap();

        assert_eq!(user.first_name, "Alicia");
        assert_eq!(user.password_hash, before.password_hash);
    }

    #[test]
    fn test_update_request_debug_masks_password() {
        let req = SelfUpdateRequest {
            password: Some(SensitiveValue::new("rabbit-hole".to_string())),
            ..Default::default()
        };
        assert!(!format!("{req:?}").contains("rabbit-hole"));

        let req = AdminUpdateRequest {
            password: Some(SensitiveValue::new("rabbit-hole".to_string())),
            ..Default::default()
        };
        assert!(!format!("{req:?}").contains("rabbit-hole"));
    }

    #[tokio::test]
    async fn test_self_update_rehashes_new_password() {
        let f = fixture().await;
        let ctx = ctx_for("alice", Role::User);
        let before = f.store.get(&ctx.username).await.unwrap().unwrap();

        let req = SelfUpdateRequest {
            password: Some(SensitiveValue::new("rabbit-hole".to_string())),
            ..Default::default()
        };
        let (user, _) = f.service.self_update(&ctx, req).await.unwrap();

        assert_ne!(user.password_hash, before.password_hash);
        assert!(f.hasher.verify("rabbit-hole", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_admin_update_changes_role_and_audits() {
        let f = fixture().await;
        let ctx = ctx_for("root", Role::Admin);

        let req = AdminUpdateRequest {
            role: Some("ADMIN".to_string()),
            ..Default::default()
        };
        let user = f
            .service
            .admin_update(&ctx, &Username::new("alice"), req)
            .await
            .unwrap();

        assert_eq!(user.role, Role::Admin);
        assert!(!f
            .audit
            .entries_for_action(AuditAction::RoleChange)
            .is_empty());
    }

    #[tokio::test]
    async fn test_admin_update_same_role_skips_role_audit() {
        let f = fixture().await;
        let ctx = ctx_for("root", Role::Admin);

        let req = AdminUpdateRequest {
            role: Some("USER".to_string()),
            country: Some("NL".to_string()),
            ..Default::default()
        };
        f.service
            .admin_update(&ctx, &Username::new("alice"), req)
            .await
            .unwrap();

        assert!(f
            .audit
            .entries_for_action(AuditAction::RoleChange)
            .is_empty());
    }

    #[tokio::test]
    async fn test_admin_update_unknown_role_rejected() {
        let f = fixture().await;
        let ctx = ctx_for("root", Role::Admin);

        let req = AdminUpdateRequest {
            role: Some("OVERLORD".to_string()),
            ..Default::default()
        };
        let err = f
            .service
            .admin_update(&ctx, &Username::new("alice"), req)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UnknownRole { .. }));
    }

    #[tokio::test]
    async fn test_admin_update_missing_target() {
        let f = fixture().await;
        let ctx = ctx_for("root", Role::Admin);

        let err = f
            .service
            .admin_update(&ctx, &Username::new("ghost"), AdminUpdateRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_and_delete_missing() {
        let f = fixture().await;
        let ctx = ctx_for("root", Role::Admin);

        f.service
            .delete(&ctx, &Username::new("alice"))
            .await
            .unwrap();
        assert_eq!(f.store.user_count(), 0);

        let err = f
            .service
            .delete(&ctx, &Username::new("alice"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }
}

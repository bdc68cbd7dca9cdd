// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Registration and login.

use std::net::IpAddr;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use shelf_core::password::PasswordHasher;
use shelf_core::role::Role;
use shelf_core::types::{ProfileFields, User, Username};
use shelf_core::{AuditLog, AuditLogger, SensitiveValue};
use shelf_store::{NewUser, UserStore};

use super::{hash_password, record, verify_password};
use crate::auth::JwtManager;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// Requests
// =============================================================================

/// Registration request body.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Desired username.
    pub username: String,
    /// Plaintext password; masked in `Debug` output.
    pub password: SensitiveValue<String>,
    /// First name.
    #[serde(default)]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: String,
    /// Country of residence.
    #[serde(default)]
    pub country: String,
    /// Requested role name; defaults to `USER` when absent.
    #[serde(default)]
    pub role: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Account username.
    pub username: String,
    /// Plaintext password; masked in `Debug` output.
    pub password: SensitiveValue<String>,
}

/// A successful authentication: the account and a token for it.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    /// The authenticated account.
    pub user: User,
    /// Freshly issued access token.
    pub token: String,
}

// =============================================================================
// AuthService
// =============================================================================

/// Registration and login flows.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    jwt: JwtManager,
    audit: Arc<dyn AuditLogger>,
}

impl AuthService {
    /// Creates a new auth service.
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

    /// Registers a new account and logs it in.
    ///
    /// The requested role must name an existing role; an unknown name is
    /// rejected before anything is written. The store's unique index is
    /// the authority on username collisions; the early lookup here only
    /// shortcuts the common case before paying for a password hash.
    pub async fn register(
        &self,
        req: RegisterRequest,
        client_ip: Option<IpAddr>,
    ) -> ApiResult<AuthOutcome> {
        let username = Username::new(&req.username);
        if username.is_blank() {
            return Err(ApiError::validation("username must not be empty"));
        }
        if req.password.inner().is_empty() {
            return Err(ApiError::validation("password must not be empty"));
        }

        let role = match req.role.as_deref() {
            Some(name) if !name.trim().is_empty() => Role::parse(name)?,
            _ => Role::User,
        };

        if self.users.get(&username).await?.is_some() {
            return Err(ApiError::duplicate_user(username.as_str()));
        }

        let hash = hash_password(self.hasher.clone(), req.password.into_inner()).await?;

        let new_user = NewUser::new(username.clone(), hash, role).with_profile(ProfileFields {
            first_name: req.first_name,
            last_name: req.last_name,
            country: req.country,
        });

        // A concurrent registration can still win the race; the store's
        // duplicate error maps to the same 409 as the early check.
        let user = self.users.create(new_user).await?;
        let token = self.jwt.issue(user.username.as_str(), user.role)?;

        info!(username = %user.username, role = %user.role, "account registered");
        record(
            self.audit.as_ref(),
            AuditLog::register(user.username.as_str(), client_ip),
        )
        .await;

        Ok(AuthOutcome { user, token })
    }

    /// Authenticates an account and issues a token.
    ///
    /// A missing account and a wrong password produce the identical
    /// error; only the audit trail records which it was.
    pub async fn login(
        &self,
        req: LoginRequest,
        client_ip: Option<IpAddr>,
    ) -> ApiResult<AuthOutcome> {
        let username = Username::new(&req.username);

        let Some(user) = self.users.get(&username).await? else {
            debug!(username = %username, "login failed: unknown account");
            record(
                self.audit.as_ref(),
                AuditLog::login(username.as_str(), client_ip, false),
            )
            .await;
            return Err(ApiError::InvalidCredentials);
        };

        let verified = verify_password(
            self.hasher.clone(),
            req.password.into_inner(),
            user.password_hash.clone(),
        )
        .await?;

        if !verified {
            debug!(username = %username, "login failed: wrong password");
            record(
                self.audit.as_ref(),
                AuditLog::login(username.as_str(), client_ip, false),
            )
            .await;
            return Err(ApiError::InvalidCredentials);
        }

        let token = self.jwt.issue(user.username.as_str(), user.role)?;

        info!(username = %user.username, role = %user.role, "login succeeded");
        record(
            self.audit.as_ref(),
            AuditLog::login(user.username.as_str(), client_ip, true),
        )
        .await;

        Ok(AuthOutcome { user, token })
    }

    /// Returns the configured token lifetime in seconds.
    pub fn token_lifetime_secs(&self) -> i64 {
        self.jwt.expiration_secs()
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
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
    use shelf_core::password::Argon2Hasher;
    use shelf_core::{AuditAction, InMemoryAuditLogger};
    use shelf_store::MemoryStore;

    fn service() -> (AuthService, Arc<MemoryStore>, Arc<InMemoryAuditLogger>) {
        let store = Arc::new(MemoryStore::new());
        let audit = Arc::new(InMemoryAuditLogger::new());
        let service = AuthService::new(
            store.clone(),
            Arc::new(Argon2Hasher::new()),
            JwtManager::new("test-secret-key-that-is-long-enough!!", "shelf", 3600).unwrap(),
            audit.clone(),
        );
        (service, store, audit)
    }

    fn alice() -> RegisterRequest {
        RegisterRequest {
            username: "alice".to_string(),
            password: SensitiveValue::new("wonderland".to_string()),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            country: "GB".to_string(),
            role: None,
        }
    }

    #[test]
    fn test_request_debug_masks_password() {
        let register = format!("{:?}", alice());
        assert!(!register.contains("wonderland"));
        assert!(register.contains("[REDACTED]"));

        let login = format!(
            "{:?}",
            LoginRequest {
                username: "alice".to_string(),
                password: SensitiveValue::new("wonderland".to_string()),
            }
        );
        assert!(!login.contains("wonderland"));
    }

    #[test]
    fn test_request_deserializes_plain_password() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"username":"alice","password":"wonderland"}"#).unwrap();
        assert_eq!(req.password.inner(), "wonderland");
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (service, _store, _audit) = service();

        let registered = service.register(alice(), None).await.unwrap();
        assert_eq!(registered.user.role, Role::User);
        assert!(!registered.token.is_empty());

        let logged_in = service
            .login(
                LoginRequest {
                    username: "alice".to_string(),
                    password: SensitiveValue::new("wonderland".to_string()),
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(logged_in.user.username.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_password() {
        let (service, store, _audit) = service();
        service.register(alice(), None).await.unwrap();

        let stored = store.get(&Username::new("alice")).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "wonderland");
        assert!(stored.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_register_duplicate_rejected() {
        let (service, store, _audit) = service();
        service.register(alice(), None).await.unwrap();

        let err = service.register(alice(), None).await.unwrap_err();
        assert!(matches!(err, ApiError::DuplicateUser { .. }));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_register_unknown_role_rejected() {
        let (service, store, _audit) = service();
        let mut req = alice();
        req.role = Some("SUPERUSER".to_string());

        let err = service.register(req, None).await.unwrap_err();
        assert!(matches!(err, ApiError::UnknownRole { .. }));
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn test_register_accepts_role_prefix_variants() {
        let (service, _store, _audit) = service();
        let mut req = alice();
        req.role = Some("ROLE_ADMIN".to_string());

        let outcome = service.register(req, None).await.unwrap();
        assert_eq!(outcome.user.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_register_validates_blank_input() {
        let (service, _store, _audit) = service();

        let mut req = alice();
        req.username = "   ".to_string();
        assert!(matches!(
            service.register(req, None).await.unwrap_err(),
            ApiError::Validation { .. }
        ));

        let mut req = alice();
        req.password = SensitiveValue::new(String::new());
        assert!(matches!(
            service.register(req, None).await.unwrap_err(),
            ApiError::Validation { .. }
        ));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, _store, _audit) = service();
        service.register(alice(), None).await.unwrap();

        let unknown = service
            .login(
                LoginRequest {
                    username: "ghost".to_string(),
                    password: SensitiveValue::new("whatever".to_string()),
                },
                None,
            )
            .await
            .unwrap_err();
        let wrong = service
            .login(
                LoginRequest {
                    username: "alice".to_string(),
                    password: SensitiveValue::new("not-wonderland".to_string()),
                },
                None,
            )
            .await
            .unwrap_err();

        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_eq!(unknown.error_code(), wrong.error_code());
    }

    #[tokio::test]
    async fn test_login_failure_is_audited() {
        let (service, _store, audit) = service();
        service.register(alice(), None).await.unwrap();

        let _ = service
            .login(
                LoginRequest {
                    username: "alice".to_string(),
                    password: SensitiveValue::new("bad".to_string()),
                },
                None,
            )
            .await;

        let failures = audit.entries_for_action(AuditAction::Login);
        assert!(!failures.is_empty());
    }
}

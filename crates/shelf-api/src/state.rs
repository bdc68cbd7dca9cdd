// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use shelf_config::ShelfConfig;
use shelf_core::password::{Argon2Hasher, PasswordHasher};
use shelf_core::{AuditLogger, NoOpAuditLogger};
use shelf_store::{FavoriteStore, UserStore};

use crate::auth::{JwtManager, RoutePolicy};
use crate::service::{AuthService, FavoriteService, UserService};

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
///
/// This is the central state container that is passed to all handlers via
/// Axum's state extraction mechanism.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Arc<ShelfConfig>,
    /// JWT manager for token operations.
    pub jwt: JwtManager,
    /// Route authorization policy.
    pub policy: Arc<RoutePolicy>,
    /// User store, kept for readiness probing.
    pub users: Arc<dyn UserStore>,
    /// Audit logger.
    pub audit: Arc<dyn AuditLogger>,
    /// Registration and login flows.
    pub auth_service: AuthService,
    /// Profile operations.
    pub user_service: UserService,
    /// Favorite book operations.
    pub favorite_service: FavoriteService,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.users.name())
            .field("jwt", &self.jwt)
            .finish()
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing AppState.
pub struct AppStateBuilder {
    config: Option<ShelfConfig>,
    users: Option<Arc<dyn UserStore>>,
    favorites: Option<Arc<dyn FavoriteStore>>,
    hasher: Option<Arc<dyn PasswordHasher>>,
    audit: Option<Arc<dyn AuditLogger>>,
    policy: Option<Arc<RoutePolicy>>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            users: None,
            favorites: None,
            hasher: None,
            audit: None,
            policy: None,
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ShelfConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the user store.
    pub fn user_store(mut self, store: Arc<dyn UserStore>) -> Self {
        self.users = Some(store);
        self
    }

    /// Sets the favorite store.
    pub fn favorite_store(mut self, store: Arc<dyn FavoriteStore>) -> Self {
        self.favorites = Some(store);
        self
    }

    /// Sets the password hasher. Defaults to Argon2.
    pub fn hasher(mut self, hasher: Arc<dyn PasswordHasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Sets the audit logger. Defaults to a no-op logger.
    pub fn audit_logger(mut self, logger: Arc<dyn AuditLogger>) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Sets the route policy. Defaults to [`RoutePolicy::standard`].
    pub fn policy(mut self, policy: Arc<RoutePolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Builds the AppState.
    pub fn build(self) -> crate::error::ApiResult<AppState> {
        let config = self.config.unwrap_or_default();

        let users = self
            .users
            .ok_or_else(|| crate::error::ApiError::internal("user store not configured"))?;
        let favorites = self
            .favorites
            .ok_or_else(|| crate::error::ApiError::internal("favorite store not configured"))?;

        let jwt = JwtManager::from_config(&config.security.jwt)?;
        let policy = self
            .policy
            .unwrap_or_else(|| Arc::new(RoutePolicy::standard()));
        let hasher: Arc<dyn PasswordHasher> = self
            .hasher
            .unwrap_or_else(|| Arc::new(Argon2Hasher::new()));
        let audit: Arc<dyn AuditLogger> = self.audit.unwrap_or_else(|| Arc::new(NoOpAuditLogger));

        let auth_service =
            AuthService::new(users.clone(), hasher.clone(), jwt.clone(), audit.clone());
        let user_service =
            UserService::new(users.clone(), hasher.clone(), jwt.clone(), audit.clone());
        let favorite_service = FavoriteService::new(favorites, audit.clone());

        Ok(AppState {
            config: Arc::new(config),
            jwt,
            policy,
            users,
            audit,
            auth_service,
            user_service,
            favorite_service,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_config::SecretValue;
    use shelf_store::MemoryStore;

    fn test_config() -> ShelfConfig {
        let mut config = ShelfConfig::default();
        config.security.jwt.secret = Some(SecretValue::new(
            "test-secret-key-that-is-long-enough!!".to_string(),
        ));
        config
    }

    #[test]
    fn test_builder_with_memory_store() {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::builder()
            .config(test_config())
            .user_store(store.clone())
            .favorite_store(store)
            .build()
            .unwrap();

        assert_eq!(state.users.name(), "memory");
        assert_eq!(state.jwt.issuer(), "shelf");
    }

    #[test]
    fn test_builder_requires_stores() {
        let err = AppState::builder().config(test_config()).build();
        assert!(err.is_err());
    }

    #[test]
    fn test_builder_requires_jwt_secret() {
        let store = Arc::new(MemoryStore::new());
        let err = AppState::builder()
            .config(ShelfConfig::default())
            .user_store(store.clone())
            .favorite_store(store)
            .build();
        assert!(err.is_err());
    }
}

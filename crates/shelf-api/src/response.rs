// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelf_core::role::Role;
use shelf_core::types::{Favorite, User};

use crate::auth::AuthContext;

// =============================================================================
// Auth Responses
// =============================================================================

/// Response to a successful registration or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Access token.
    pub token: String,
    /// Token type (always "Bearer").
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    /// Where the client should navigate next for this role.
    pub redirect: String,
    /// The account the token was issued for.
    pub user: User,
}

impl AuthResponse {
    /// Creates a new auth response.
    pub fn new(token: String, expires_in: i64, user: User) -> Self {
        let redirect = user.role.redirect_path().to_string();
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
            redirect,
            user,
        }
    }
}

// =============================================================================
// Profile Responses
// =============================================================================

/// The caller's own profile together with the claims of the token that
/// fetched it.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// The account profile.
    pub user: User,
    /// Claims of the presented token.
    pub token: TokenInfo,
}

/// Token claims echoed back to the caller.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Subject username.
    pub username: String,
    /// Role embedded in the token.
    pub role: Role,
    /// When the token was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
    /// When the token expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenInfo {
    /// Builds token info from an authenticated context.
    pub fn from_context(ctx: &AuthContext) -> Self {
        Self {
            username: ctx.username.as_str().to_string(),
            role: ctx.role.unwrap_or_default(),
            issued_at: ctx.token_issued_at,
            expires_at: ctx.token_expires_at,
        }
    }
}

/// Response to a profile update.
///
/// Carries a fresh token: the old one may embed stale claims after the
/// update (a changed role, most importantly).
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateResponse {
    /// The updated account.
    pub user: User,
    /// Replacement access token.
    pub token: String,
    /// Token type (always "Bearer").
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

impl UpdateResponse {
    /// Creates a new update response.
    pub fn new(user: User, token: String, expires_in: i64) -> Self {
        Self {
            user,
            token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

// =============================================================================
// Listing Responses
// =============================================================================

/// Response listing all accounts (admin only).
#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    /// All accounts.
    pub users: Vec<User>,
    /// Number of accounts.
    pub total: usize,
}

impl UserListResponse {
    /// Creates a listing response.
    pub fn new(users: Vec<User>) -> Self {
        let total = users.len();
        Self { users, total }
    }
}

/// Response listing the caller's favorite books.
#[derive(Debug, Serialize, Deserialize)]
pub struct FavoriteListResponse {
    /// The favorites, in the order they were added.
    pub favorites: Vec<Favorite>,
    /// Number of favorites.
    pub total: usize,
}

impl FavoriteListResponse {
    /// Creates a listing response.
    pub fn new(favorites: Vec<Favorite>) -> Self {
        let total = favorites.len();
        Self { favorites, total }
    }
}

// =============================================================================
// Health Responses
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Version string.
    pub version: String,
}

impl HealthResponse {
    /// Creates a healthy response.
    pub fn healthy() -> Self {
        Self {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

/// Readiness check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Whether the service is ready.
    pub ready: bool,
    /// Component statuses.
    pub components: Vec<ComponentStatus>,
}

/// Status of a system component.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentStatus {
    /// Component name.
    pub name: String,
    /// Whether the component is healthy.
    pub healthy: bool,
    /// Optional message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    /// Creates a healthy component status.
    pub fn healthy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            healthy: true,
            message: None,
        }
    }

    /// Creates an unhealthy component status.
    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            healthy: false,
            message: Some(message.into()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Claims;
    use shelf_core::types::Username;

    fn user(role: Role) -> User {
        let now = Utc::now();
        User {
            id: 1,
            username: Username::new("alice"),
            password_hash: "$argon2id$stub".to_string(),
            role,
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            country: "GB".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_auth_response_redirect_follows_role() {
        let resp = AuthResponse::new("tok".to_string(), 3600, user(Role::Admin));
        assert_eq!(resp.redirect, "/admin/all-users");
        assert_eq!(resp.token_type, "Bearer");

        let resp = AuthResponse::new("tok".to_string(), 3600, user(Role::User));
        assert_eq!(resp.redirect, "/my-profile");
    }

    #[test]
    fn test_auth_response_never_serializes_password_hash() {
        let resp = AuthResponse::new("tok".to_string(), 3600, user(Role::User));
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn test_token_info_from_context() {
        let ctx = AuthContext::from_claims(&Claims::new("alice", Role::User, 3600, "shelf"));
        let info = TokenInfo::from_context(&ctx);

        assert_eq!(info.username, "alice");
        assert_eq!(info.role, Role::User);
        assert!(info.expires_at.is_some());
    }

    #[test]
    fn test_list_response_counts() {
        let resp = UserListResponse::new(vec![user(Role::User), user(Role::Admin)]);
        assert_eq!(resp.total, 2);

        let resp = FavoriteListResponse::new(vec![]);
        assert_eq!(resp.total, 0);
    }
}

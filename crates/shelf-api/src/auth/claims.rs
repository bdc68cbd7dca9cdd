// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! JWT claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shelf_core::role::Role;

/// JWT claims for authentication.
///
/// The subject is the account username and the single custom claim is the
/// account role. Role is typed: a token whose `role` claim is not a known
/// role name fails deserialization, and therefore validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    // =========================================================================
    // Standard JWT Claims (RFC 7519)
    // =========================================================================
    /// Subject - the account username.
    pub sub: String,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at time (Unix timestamp).
    pub iat: i64,

    /// Not before time (Unix timestamp).
    pub nbf: i64,

    /// Issuer.
    pub iss: String,

    /// JWT ID, unique per issued token.
    pub jti: String,

    // =========================================================================
    // Custom Claims
    // =========================================================================
    /// Account role at issue time.
    pub role: Role,
}

impl Claims {
    /// Creates new claims for an account.
    pub fn new(
        username: impl Into<String>,
        role: Role,
        expires_in_secs: i64,
        issuer: impl Into<String>,
    ) -> Self {
        let now = Utc::now().timestamp();

        Self {
            sub: username.into(),
            exp: now + expires_in_secs,
            iat: now,
            nbf: now,
            iss: issuer.into(),
            jti: Uuid::now_v7().to_string(),
            role,
        }
    }

    /// Returns the account username.
    pub fn username(&self) -> &str {
        &self.sub
    }

    /// Returns `true` if the token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Returns the expiration time as a DateTime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns the issued at time as a DateTime.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Returns the time remaining until expiration.
    pub fn time_until_expiration(&self) -> Option<std::time::Duration> {
        let now = Utc::now().timestamp();
        if self.exp > now {
            Some(std::time::Duration::from_secs((self.exp - now) as u64))
        } else {
            None
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("alice", Role::User, 3600, "shelf");

        assert_eq!(claims.username(), "alice");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.iss, "shelf");
        assert!(!claims.is_expired());
        assert!(claims.time_until_expiration().is_some());
    }

    #[test]
    fn test_claims_unique_jti() {
        let a = Claims::new("alice", Role::User, 3600, "shelf");
        let b = Claims::new("alice", Role::User, 3600, "shelf");
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_claims_expiration() {
        let expired = Claims::new("alice", Role::User, -100, "shelf");
        assert!(expired.is_expired());
        assert!(expired.time_until_expiration().is_none());
    }

    #[test]
    fn test_role_claim_serialized_uppercase() {
        let claims = Claims::new("root", Role::Admin, 3600, "shelf");
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["role"], "ADMIN");
        assert_eq!(json["sub"], "root");
    }

    #[test]
    fn test_unknown_role_claim_rejected() {
        let json = serde_json::json!({
            "sub": "alice",
            "exp": Utc::now().timestamp() + 3600,
            "iat": Utc::now().timestamp(),
            "nbf": Utc::now().timestamp(),
            "iss": "shelf",
            "jti": "x",
            "role": "SUPERUSER",
        });
        assert!(serde_json::from_value::<Claims>(json).is_err());
    }
}

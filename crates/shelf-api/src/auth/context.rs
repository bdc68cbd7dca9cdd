// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication context.

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shelf_core::role::Role;
use shelf_core::types::Username;

use super::Claims;

/// Authentication context for a request.
///
/// Attached to every request by the auth middleware, authenticated or not,
/// and read by handlers, the route policy, and audit logging. The
/// anonymous context uses the reserved `anonymous` subject and carries no
/// role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Account username, or `anonymous`.
    pub username: Username,
    /// Account role; `None` for anonymous requests.
    pub role: Option<Role>,
    /// Client IP address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<IpAddr>,
    /// Request ID for tracing.
    pub request_id: Uuid,
    /// When the presented token was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_issued_at: Option<DateTime<Utc>>,
    /// When the presented token expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expires_at: Option<DateTime<Utc>>,
}

impl AuthContext {
    /// Creates an authenticated context from validated JWT claims.
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            username: Username::new(&claims.sub),
            role: Some(claims.role),
            client_ip: None,
            request_id: Uuid::now_v7(),
            token_issued_at: claims.issued_at(),
            token_expires_at: claims.expires_at(),
        }
    }

    /// Creates an anonymous context (for unauthenticated requests).
    pub fn anonymous() -> Self {
        Self {
            username: Username::new("anonymous"),
            role: None,
            client_ip: None,
            request_id: Uuid::now_v7(),
            token_issued_at: None,
            token_expires_at: None,
        }
    }

    /// Sets the client IP address.
    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// Sets the request ID.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns `true` if this is an anonymous context.
    pub fn is_anonymous(&self) -> bool {
        self.role.is_none()
    }

    /// Returns `true` if this context carries administrative privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_some_and(|r| r.is_admin())
    }

    /// Returns `true` if this context satisfies the required role.
    pub fn satisfies(&self, required: Role) -> bool {
        self.role.is_some_and(|r| r.satisfies(required))
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_claims() {
        let claims = Claims::new("alice", Role::User, 3600, "shelf");
        let ctx = AuthContext::from_claims(&claims);

        assert_eq!(ctx.username.as_str(), "alice");
        assert_eq!(ctx.role, Some(Role::User));
        assert!(!ctx.is_anonymous());
        assert!(!ctx.is_admin());
        assert!(ctx.token_expires_at.is_some());
    }

    #[test]
    fn test_anonymous_context() {
        let ctx = AuthContext::anonymous();

        assert!(ctx.is_anonymous());
        assert!(!ctx.is_admin());
        assert!(!ctx.satisfies(Role::User));
    }

    #[test]
    fn test_role_satisfaction() {
        let admin = AuthContext::from_claims(&Claims::new("root", Role::Admin, 3600, "shelf"));
        assert!(admin.is_admin());
        assert!(admin.satisfies(Role::Admin));
        assert!(admin.satisfies(Role::User));

        let user = AuthContext::from_claims(&Claims::new("alice", Role::User, 3600, "shelf"));
        assert!(user.satisfies(Role::User));
        assert!(!user.satisfies(Role::Admin));
    }

    #[test]
    fn test_context_carries_client_ip() {
        let ctx = AuthContext::from_claims(&Claims::new("alice", Role::User, 3600, "shelf"))
            .with_client_ip("127.0.0.1".parse().unwrap());
        assert!(ctx.client_ip.is_some());
    }
}

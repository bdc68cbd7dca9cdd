// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route-level role-based access control.
//!
//! Authorization is decided per URL path, before any handler runs. A
//! [`RoutePolicy`] holds an ordered set of prefix rules mapping paths to
//! the minimum role they require, plus a list of public paths that skip
//! authentication entirely. The longest matching prefix wins, so `/admin`
//! rules shadow a broader `/api` rule.

use serde::{Deserialize, Serialize};

use shelf_core::role::Role;

use super::AuthContext;

// =============================================================================
// RoutePolicy
// =============================================================================

/// Path-based authorization policy.
#[derive(Debug, Clone, Default)]
pub struct RoutePolicy {
    rules: Vec<RouteRule>,
    public: Vec<String>,
}

/// A single prefix rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RouteRule {
    prefix: String,
    required: Role,
}

impl RoutePolicy {
    /// Creates an empty policy. Everything is denied until rules are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// The service's standard policy.
    ///
    /// Health probes and the auth endpoints are public; `/api` requires a
    /// logged-in account; `/admin` requires an administrator.
    pub fn standard() -> Self {
        Self::new()
            .allow_public("/health")
            .allow_public("/ready")
            .allow_public("/auth/register")
            .allow_public("/auth/login")
            .require("/api", Role::User)
            .require("/admin", Role::Admin)
    }

    /// Marks a path (and everything under it) as public.
    pub fn allow_public(mut self, path: impl Into<String>) -> Self {
        self.public.push(path.into());
        self
    }

    /// Requires at least `role` for a path prefix.
    pub fn require(mut self, prefix: impl Into<String>, role: Role) -> Self {
        self.rules.push(RouteRule {
            prefix: prefix.into(),
            required: role,
        });
        // Longest prefix first, so the most specific rule wins.
        self.rules
            .sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        self
    }

    /// Returns `true` if the path needs no authentication.
    pub fn is_public(&self, path: &str) -> bool {
        self.public.iter().any(|p| Self::prefix_matches(p, path))
    }

    /// Returns the minimum role required for the path, if any rule matches.
    pub fn required_role(&self, path: &str) -> Option<Role> {
        self.rules
            .iter()
            .find(|r| Self::prefix_matches(&r.prefix, path))
            .map(|r| r.required)
    }

    /// Decides whether the given context may access the path.
    ///
    /// Public paths are always allowed. Paths with no matching rule are
    /// denied for anonymous callers and allowed for any authenticated one.
    pub fn authorize(&self, path: &str, ctx: &AuthContext) -> AccessDecision {
        if self.is_public(path) {
            return AccessDecision::Allowed;
        }
        if ctx.is_anonymous() {
            return AccessDecision::Denied(DenialReason::Unauthenticated);
        }
        match self.required_role(path) {
            Some(required) if !ctx.satisfies(required) => {
                AccessDecision::Denied(DenialReason::InsufficientRole)
            }
            _ => AccessDecision::Allowed,
        }
    }

    /// Prefix match on path segment boundaries: `/api` matches `/api` and
    /// `/api/info` but not `/apiary`.
    fn prefix_matches(prefix: &str, path: &str) -> bool {
        match path.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

// =============================================================================
// AccessDecision
// =============================================================================

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Request may proceed.
    Allowed,
    /// Request is denied for the given reason.
    Denied(DenialReason),
}

impl AccessDecision {
    /// Returns `true` if the request may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed)
    }
}

/// Why a request was denied.
///
/// The reason is recorded in logs and the audit trail. Clients only see
/// the mapped status code and a generic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// No credentials were presented.
    Unauthenticated,
    /// The presented token is past its expiry.
    TokenExpired,
    /// The presented token failed signature or structural checks.
    TokenInvalid,
    /// The account's role does not meet the route's requirement.
    InsufficientRole,
}

impl DenialReason {
    /// Returns the reason as a stable string for logs and audit entries.
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialReason::Unauthenticated => "unauthenticated",
            DenialReason::TokenExpired => "token_expired",
            DenialReason::TokenInvalid => "token_invalid",
            DenialReason::InsufficientRole => "insufficient_role",
        }
    }

    /// Returns `true` if this is an authorization (403) rather than an
    /// authentication (401) failure.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, DenialReason::InsufficientRole)
    }
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Claims;

    fn user_ctx() -> AuthContext {
        AuthContext::from_claims(&Claims::new("alice", Role::User, 3600, "shelf"))
    }

    fn admin_ctx() -> AuthContext {
        AuthContext::from_claims(&Claims::new("root", Role::Admin, 3600, "shelf"))
    }

    #[test]
    fn test_public_paths() {
        let policy = RoutePolicy::standard();

        assert!(policy.is_public("/health"));
        assert!(policy.is_public("/auth/login"));
        assert!(!policy.is_public("/api/info"));
        assert!(!policy.is_public("/admin/users"));
    }

    #[test]
    fn test_prefix_matches_on_segment_boundaries() {
        let policy = RoutePolicy::new().require("/api", Role::User);

        assert_eq!(policy.required_role("/api"), Some(Role::User));
        assert_eq!(policy.required_role("/api/info"), Some(Role::User));
        assert_eq!(policy.required_role("/apiary"), None);
    }

    #[test]
    fn test_longest_prefix_wins() {
        let policy = RoutePolicy::new()
            .require("/api", Role::User)
            .require("/api/admin", Role::Admin);

        assert_eq!(policy.required_role("/api/info"), Some(Role::User));
        assert_eq!(policy.required_role("/api/admin/x"), Some(Role::Admin));
    }

    #[test]
    fn test_anonymous_denied_on_protected_paths() {
        let policy = RoutePolicy::standard();
        let anon = AuthContext::anonymous();

        assert!(policy.authorize("/health", &anon).is_allowed());
        assert_eq!(
            policy.authorize("/api/info", &anon),
            AccessDecision::Denied(DenialReason::Unauthenticated)
        );
        assert_eq!(
            policy.authorize("/admin/users", &anon),
            AccessDecision::Denied(DenialReason::Unauthenticated)
        );
    }

    #[test]
    fn test_user_allowed_on_api_denied_on_admin() {
        let policy = RoutePolicy::standard();
        let ctx = user_ctx();

        assert!(policy.authorize("/api/favorites", &ctx).is_allowed());
        assert_eq!(
            policy.authorize("/admin/users", &ctx),
            AccessDecision::Denied(DenialReason::InsufficientRole)
        );
    }

    #[test]
    fn test_admin_allowed_everywhere() {
        let policy = RoutePolicy::standard();
        let ctx = admin_ctx();

        assert!(policy.authorize("/api/info", &ctx).is_allowed());
        assert!(policy.authorize("/admin/delete/alice", &ctx).is_allowed());
    }

    #[test]
    fn test_denial_reason_classification() {
        assert!(!DenialReason::Unauthenticated.is_forbidden());
        assert!(!DenialReason::TokenExpired.is_forbidden());
        assert!(DenialReason::InsufficientRole.is_forbidden());
        assert_eq!(DenialReason::TokenInvalid.as_str(), "token_invalid");
    }
}

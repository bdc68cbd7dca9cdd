// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Domain-specific assertion helpers for Shelf integration tests.
//!
//! ## Design Principles
//!
//! - Provide clear, informative failure messages
//! - Chain-able assertions for complex validations
//! - Never leak credential material into failure output

use serde_json::Value;

use shelf_core::audit::{ActionResult, AuditAction, AuditLog, InMemoryAuditLogger};
use shelf_core::role::Role;
use shelf_core::types::User;

// =============================================================================
// User Assertions
// =============================================================================

/// Assertion extensions for `User`.
pub trait UserAssertions {
    /// Assert the account holds a specific role.
    fn assert_role(&self, expected: Role);

    /// Assert the profile fields match.
    fn assert_profile(&self, first: &str, last: &str, country: &str);

    /// Assert the serialized form never exposes the password hash.
    fn assert_hash_not_serialized(&self);
}

impl UserAssertions for User {
    fn assert_role(&self, expected: Role) {
        assert_eq!(
            self.role, expected,
            "Expected role {:?} for {}, got {:?}",
            expected, self.username, self.role
        );
    }

    fn assert_profile(&self, first: &str, last: &str, country: &str) {
        assert_eq!(self.first_name, first, "first_name mismatch for {}", self.username);
        assert_eq!(self.last_name, last, "last_name mismatch for {}", self.username);
        assert_eq!(self.country, country, "country mismatch for {}", self.username);
    }

    fn assert_hash_not_serialized(&self) {
        let json = serde_json::to_value(self).expect("user serializes");
        assert!(
            json.get("password_hash").is_none(),
            "serialized user for {} exposes the password hash",
            self.username
        );
    }
}

// =============================================================================
// Audit Log Assertions
// =============================================================================

/// Assertion extensions for a single audit entry.
pub trait AuditLogAssertions {
    /// Assert the entry records the given action.
    fn assert_action(&self, expected: AuditAction);

    /// Assert the entry records a successful outcome.
    fn assert_success(&self);

    /// Assert the entry records a denied or failed outcome.
    fn assert_not_success(&self);

    /// Assert the entry is attributed to the given actor.
    fn assert_actor(&self, username: &str);
}

impl AuditLogAssertions for AuditLog {
    fn assert_action(&self, expected: AuditAction) {
        assert_eq!(
            self.action, expected,
            "Expected action {:?}, got {:?} (resource {})",
            expected,
            self.action,
            self.resource.full_path()
        );
    }

    fn assert_success(&self) {
        assert!(
            self.result.is_success(),
            "Expected success for {:?}, got {:?}",
            self.action,
            self.result
        );
    }

    fn assert_not_success(&self) {
        assert!(
            !self.result.is_success(),
            "Expected non-success for {:?}, got {:?}",
            self.action,
            self.result
        );
    }

    fn assert_actor(&self, username: &str) {
        assert_eq!(
            self.username.as_deref(),
            Some(username),
            "Expected actor {} for {:?}, got {:?}",
            username,
            self.action,
            self.username
        );
    }
}

// =============================================================================
// Audit Trail Assertions
// =============================================================================

/// Assertion extensions for the in-memory audit trail.
pub trait AuditTrailAssertions {
    /// Assert at least one entry with this action was recorded.
    fn assert_logged(&self, action: AuditAction);

    /// Assert no entry with this action was recorded.
    fn assert_not_logged(&self, action: AuditAction);

    /// Assert an entry with this action was recorded for this actor.
    fn assert_logged_for(&self, action: AuditAction, username: &str);

    /// Assert a denied or failed entry with this action was recorded.
    fn assert_denied(&self, action: AuditAction);
}

impl AuditTrailAssertions for InMemoryAuditLogger {
    fn assert_logged(&self, action: AuditAction) {
        assert!(
            !self.entries_for_action(action).is_empty(),
            "No audit entry with action {:?} (trail: {:?})",
            action,
            self.entries()
                .iter()
                .map(|e| e.action)
                .collect::<Vec<_>>()
        );
    }

    fn assert_not_logged(&self, action: AuditAction) {
        assert!(
            self.entries_for_action(action).is_empty(),
            "Unexpected audit entry with action {:?}",
            action
        );
    }

    fn assert_logged_for(&self, action: AuditAction, username: &str) {
        assert!(
            self.has_entry(|e| e.action == action && e.username.as_deref() == Some(username)),
            "No audit entry with action {:?} for actor {}",
            action,
            username
        );
    }

    fn assert_denied(&self, action: AuditAction) {
        assert!(
            self.has_entry(|e| e.action == action && !e.result.is_success()),
            "No denied/failed audit entry with action {:?}",
            action
        );
    }
}

// =============================================================================
// JSON Assertions
// =============================================================================

/// Assert a JSON object carries all of the named keys.
#[track_caller]
pub fn assert_json_has_keys(value: &Value, keys: &[&str]) {
    let object = value
        .as_object()
        .unwrap_or_else(|| panic!("expected a JSON object, got {}", value));
    for key in keys {
        assert!(object.contains_key(*key), "missing key `{}` in {}", key, value);
    }
}

/// Assert a JSON object does not carry the named key anywhere at top level.
#[track_caller]
pub fn assert_json_lacks_key(value: &Value, key: &str) {
    if let Some(object) = value.as_object() {
        assert!(!object.contains_key(key), "unexpected key `{}` in {}", key, value);
    }
}

/// Assert a result entry in a success/failure pair is a success.
#[track_caller]
pub fn assert_result_success(result: &ActionResult) {
    assert!(result.is_success(), "expected success, got {:?}", result);
}

// =============================================================================
// Tests
// =============================================================================

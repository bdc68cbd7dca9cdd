// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Core Integration Tests
//!
//! Integration tests for shelf-core functionality including:
//!
//! - Roles and the redirect rules tied to them
//! - Password hashing and verification
//! - Audit entry construction and the audit loggers
//!
//! ## Test Categories
//!
//! - `test_role_*`: Role tests
//! - `test_password_*`: Hashing tests
//! - `test_audit_*`: Audit trail tests

use shelf_core::audit::{
    ActionResult, AuditAction, AuditFilter, AuditLog, AuditLogger, AuditSeverity,
    FileAuditLogger, InMemoryAuditLogger, RotationConfig,
};
use shelf_core::password::{Argon2Hasher, PasswordHasher};
use shelf_core::role::Role;
use shelf_core::types::{BookRef, Username};

use shelf_tests::common::{init_test_logging, temp_test_dir};

// =============================================================================
// Role Tests
// =============================================================================

#[test]
fn test_role_parse_accepts_all_client_spellings() {
    for spelling in ["ADMIN", "admin", " Admin ", "ROLE_ADMIN", "role_admin"] {
        assert_eq!(Role::parse(spelling).unwrap(), Role::Admin, "{spelling:?}");
    }
    for spelling in ["USER", "user", "ROLE_USER"] {
        assert_eq!(Role::parse(spelling).unwrap(), Role::User, "{spelling:?}");
    }
}

#[test]
fn test_role_parse_is_closed() {
    assert!(Role::parse("MODERATOR").is_err());
    assert!(Role::parse("").is_err());
    assert!(Role::parse("ROLE_").is_err());
}

#[test]
fn test_role_privilege_ordering() {
    assert!(Role::Admin.satisfies(Role::User));
    assert!(!Role::User.satisfies(Role::Admin));
}

#[test]
fn test_role_redirects_by_privilege() {
    assert_eq!(Role::Admin.redirect_path(), "/admin/all-users");
    assert_eq!(Role::User.redirect_path(), "/my-profile");
}

// =============================================================================
// Password Tests
// =============================================================================

#[test]
fn test_password_hash_verify_roundtrip() {
    let hasher = Argon2Hasher::new();

    let hash = hasher.hash("hunter2hunter2").unwrap();
    assert!(hasher.verify("hunter2hunter2", &hash).unwrap());
    assert!(!hasher.verify("hunter2", &hash).unwrap());
}

#[test]
fn test_password_hashes_never_repeat() {
    let hasher = Argon2Hasher::new();

    let a = hasher.hash("same input").unwrap();
    let b = hasher.hash("same input").unwrap();
    assert_ne!(a, b);
    assert!(hasher.verify("same input", &a).unwrap());
    assert!(hasher.verify("same input", &b).unwrap());
}

#[test]
fn test_password_garbage_hash_is_an_error_not_a_mismatch() {
    let hasher = Argon2Hasher::new();
    assert!(hasher.verify("anything", "not-a-phc-string").is_err());
}

// =============================================================================
// Audit Entry Tests
// =============================================================================

#[test]
fn test_audit_login_failure_carries_warning_severity() {
    let ok = AuditLog::login("alice", None, true);
    assert_eq!(ok.severity, AuditSeverity::Info);
    assert!(ok.result.is_success());

    let bad = AuditLog::login("alice", None, false);
    assert_eq!(bad.severity, AuditSeverity::Warning);
    assert!(bad.result.is_failure());
}

#[test]
fn test_audit_role_change_records_both_roles() {
    let entry = AuditLog::role_changed("alice", Role::User, Role::Admin, "root", None);

    assert_eq!(entry.action, AuditAction::RoleChange);
    assert_eq!(entry.details["old_role"], "USER");
    assert_eq!(entry.details["new_role"], "ADMIN");
    assert_eq!(entry.username.as_deref(), Some("root"));
}

#[test]
fn test_audit_token_rejection_keeps_reason_server_side() {
    let entry = AuditLog::token_rejected("signature mismatch", None);

    assert_eq!(entry.action, AuditAction::TokenReject);
    match &entry.result {
        ActionResult::Rejected { reason } => assert_eq!(reason, "signature mismatch"),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn test_audit_entries_never_serialize_credentials() {
    let entry = AuditLog::register("alice", None);
    let json = serde_json::to_string(&entry).unwrap();

    assert!(!json.contains("password"));
    assert!(!json.contains("hash"));
}

// =============================================================================
// In-Memory Logger Tests
// =============================================================================

#[tokio::test]
async fn test_audit_memory_logger_records_and_filters() {
    let logger = InMemoryAuditLogger::new();

    logger.log(AuditLog::login("alice", None, true)).await.unwrap();
    logger.log(AuditLog::login("mallory", None, false)).await.unwrap();
    logger
        .log(AuditLog::favorite_added("alice", "OL1W", None))
        .await
        .unwrap();

    assert_eq!(logger.len(), 3);
    assert_eq!(logger.entries_for_user("alice").len(), 2);
    assert_eq!(logger.entries_for_action(AuditAction::Login).len(), 2);
    assert_eq!(logger.failed_entries().len(), 1);
}

#[tokio::test]
async fn test_audit_memory_logger_supports_queries() {
    let logger = InMemoryAuditLogger::new();
    logger.log(AuditLog::login("alice", None, false)).await.unwrap();
    logger.log(AuditLog::register("bob", None)).await.unwrap();

    let results = logger
        .query(AuditFilter::new().action(AuditAction::Login))
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].username.as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_audit_memory_logger_capacity_bound() {
    let logger = InMemoryAuditLogger::with_capacity(2);

    for name in ["a", "b", "c"] {
        logger.log(AuditLog::register(name, None)).await.unwrap();
    }

    // Oldest entry is evicted.
    assert_eq!(logger.len(), 2);
    assert!(logger.entries_for_user("a").is_empty());
}

// =============================================================================
// File Logger Tests
// =============================================================================

#[tokio::test]
async fn test_audit_file_logger_writes_json_lines() {
    init_test_logging();
    let dir = temp_test_dir("shelf-audit-");
    let path = dir.path().join("audit.log");

    let logger = FileAuditLogger::new(&path, RotationConfig::never()).unwrap();
    logger.log(AuditLog::login("alice", None, true)).await.unwrap();
    logger
        .log(AuditLog::user_deleted("bob", "root", None))
        .await
        .unwrap();
    logger.flush().await.unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: AuditLog = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first.action, AuditAction::Login);
    assert_eq!(logger.total_logs_written(), 2);
}

// =============================================================================
// Type Tests
// =============================================================================

#[test]
fn test_username_is_a_transparent_string() {
    let name = Username::from("alice");
    assert_eq!(name.as_str(), "alice");
    assert!(!name.is_blank());
    assert!(Username::from("   ").is_blank());
}

#[test]
fn test_book_ref_optional_fields() {
    let bare = BookRef::new("OL1W", "Untitled");
    assert!(bare.cover_id.is_none());
    assert!(bare.authors.is_empty());

    let full = BookRef::new("OL2W", "Titled")
        .with_cover("c9")
        .with_authors("Someone");
    assert_eq!(full.cover_id.as_deref(), Some("c9"));
}

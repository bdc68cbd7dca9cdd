// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! Mock implementations for testing Shelf components in isolation.
//!
//! ## Design Principles
//!
//! - Configurable behavior for different test scenarios
//! - Recording of interactions for verification
//! - Thread-safe for concurrent testing
//! - Easy to set up error injection

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;

use shelf_core::audit::{AuditError, AuditFilter, AuditLog, AuditLogger, AuditResult};
use shelf_core::types::{BookRef, Favorite, User, Username};
use shelf_store::{FavoriteStore, NewUser, StoreError, UserStore, UserUpdate};

// =============================================================================
// Failing Store
// =============================================================================

/// A store whose every operation fails with a connection error.
///
/// Useful for exercising error paths and the readiness probe.
#[derive(Debug, Default)]
pub struct FailingStore {
    /// Number of calls received, for verifying that a path was reached.
    call_count: AtomicU64,
}

impl FailingStore {
    /// Creates a new failing store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many operations were attempted.
    pub fn calls(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<T, StoreError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::connection("injected failure"))
    }
}

#[async_trait]
impl UserStore for FailingStore {
    async fn create(&self, _user: NewUser) -> Result<User, StoreError> {
        self.fail()
    }

    async fn get(&self, _username: &Username) -> Result<Option<User>, StoreError> {
        self.fail()
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        self.fail()
    }

    async fn update(&self, _username: &Username, _update: UserUpdate) -> Result<User, StoreError> {
        self.fail()
    }

    async fn delete(&self, _username: &Username) -> Result<(), StoreError> {
        self.fail()
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.fail()
    }

    fn name(&self) -> &str {
        "failing-store"
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.fail()
    }
}

#[async_trait]
impl FavoriteStore for FailingStore {
    async fn add(&self, _username: &Username, _book: BookRef) -> Result<Favorite, StoreError> {
        self.fail()
    }

    async fn list_for(&self, _username: &Username) -> Result<Vec<Favorite>, StoreError> {
        self.fail()
    }

    async fn remove(&self, _username: &Username, _book_id: &str) -> Result<(), StoreError> {
        self.fail()
    }

    async fn count_for(&self, _username: &Username) -> Result<u64, StoreError> {
        self.fail()
    }
}

// =============================================================================
// Unhealthy Audit Logger
// =============================================================================

/// An audit logger that accepts entries but can report itself unhealthy
/// or reject writes on demand.
#[derive(Debug, Default)]
pub struct FlakyAuditLogger {
    healthy: AtomicBool,
    fail_writes: AtomicBool,
    write_count: AtomicU64,
}

impl FlakyAuditLogger {
    /// Creates a logger that starts healthy.
    pub fn new() -> Self {
        Self {
            healthy: AtomicBool::new(true),
            fail_writes: AtomicBool::new(false),
            write_count: AtomicU64::new(0),
        }
    }

    /// Marks the logger unhealthy.
    pub fn set_unhealthy(&self) {
        self.healthy.store(false, Ordering::SeqCst);
    }

    /// Makes subsequent writes fail.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Returns how many entries were accepted.
    pub fn writes(&self) -> u64 {
        self.write_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuditLogger for FlakyAuditLogger {
    async fn log(&self, _entry: AuditLog) -> AuditResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AuditError::write_failed("injected failure"));
        }
        self.write_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn query(&self, _filter: AuditFilter) -> AuditResult<Vec<AuditLog>> {
        Err(AuditError::query_not_supported("flaky-audit-logger"))
    }

    async fn flush(&self) -> AuditResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "flaky-audit-logger"
    }

    async fn health_check(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failing_store_counts_calls() {
        let store = FailingStore::new();
        assert!(UserStore::list(&store).await.is_err());
        assert!(UserStore::count(&store).await.is_err());
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_flaky_logger_health() {
        let logger = FlakyAuditLogger::new();
        assert!(logger.health_check().await);

        logger.set_unhealthy();
        assert!(!logger.health_check().await);
    }

    #[tokio::test]
    async fn test_flaky_logger_write_injection() {
        let logger = FlakyAuditLogger::new();
        logger.log(AuditLog::system_start("test")).await.unwrap();
        assert_eq!(logger.writes(), 1);

        logger.fail_writes();
        assert!(logger.log(AuditLog::system_start("test")).await.is_err());
        assert_eq!(logger.writes(), 1);
    }
}

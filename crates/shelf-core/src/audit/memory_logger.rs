// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory audit logger for testing and development.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::error::AuditResult;
use super::types::{AuditAction, AuditFilter, AuditLog, AuditSeverity};
use super::AuditLogger;

// =============================================================================
// In-Memory Audit Logger
// =============================================================================

/// In-memory audit logger for testing and development.
///
/// Stores all audit entries in memory, supporting both logging and querying.
/// Tests use this to assert that denials and credential failures were
/// recorded without touching the filesystem.
///
/// # Thread Safety
///
/// This logger is thread-safe and can be shared across multiple tasks.
/// Clones share the same underlying entries.
#[derive(Debug, Clone)]
pub struct InMemoryAuditLogger {
    /// Stored log entries.
    logs: Arc<RwLock<Vec<AuditLog>>>,
    /// Maximum number of entries to keep (0 = unlimited).
    max_entries: usize,
    /// Name of this logger.
    name: String,
}

impl Default for InMemoryAuditLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAuditLogger {
    /// Creates a new in-memory logger with unlimited capacity.
    pub fn new() -> Self {
        Self {
            logs: Arc::new(RwLock::new(Vec::new())),
            max_entries: 0,
            name: "memory".to_string(),
        }
    }

    /// Creates a new in-memory logger with a maximum capacity.
    ///
    /// When the capacity is reached, oldest entries are removed.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            logs: Arc::new(RwLock::new(Vec::with_capacity(max_entries.min(10000)))),
            max_entries,
            name: "memory".to_string(),
        }
    }

    /// Returns all logged entries.
    pub fn entries(&self) -> Vec<AuditLog> {
        self.logs.read().clone()
    }

    /// Returns entries matching a predicate.
    pub fn entries_where<F>(&self, predicate: F) -> Vec<AuditLog>
    where
        F: Fn(&AuditLog) -> bool,
    {
        self.logs.read().iter().filter(|l| predicate(l)).cloned().collect()
    }

    /// Clears all entries.
    pub fn clear(&self) {
        self.logs.write().clear();
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.logs.read().len()
    }

    /// Returns `true` if empty.
    pub fn is_empty(&self) -> bool {
        self.logs.read().is_empty()
    }

    /// Returns entries for a specific account.
    pub fn entries_for_user(&self, username: &str) -> Vec<AuditLog> {
        self.entries_where(|l| l.username.as_deref() == Some(username))
    }

    /// Returns entries for a specific action.
    pub fn entries_for_action(&self, action: AuditAction) -> Vec<AuditLog> {
        self.entries_where(|l| l.action == action)
    }

    /// Returns entries at or above a severity level.
    pub fn entries_by_severity(&self, min_severity: AuditSeverity) -> Vec<AuditLog> {
        self.entries_where(|l| l.severity.level() >= min_severity.level())
    }

    /// Returns security-sensitive entries.
    pub fn security_events(&self) -> Vec<AuditLog> {
        self.entries_where(|l| l.action.is_security_sensitive())
    }

    /// Returns failed or denied entries.
    pub fn failed_entries(&self) -> Vec<AuditLog> {
        self.entries_where(|l| l.result.is_failure() || l.result.is_denied())
    }

    /// Checks if any entry matches the predicate.
    pub fn has_entry<F>(&self, predicate: F) -> bool
    where
        F: Fn(&AuditLog) -> bool,
    {
        self.logs.read().iter().any(predicate)
    }

    /// Counts entries matching a predicate.
    pub fn count_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&AuditLog) -> bool,
    {
        self.logs.read().iter().filter(|l| predicate(l)).count()
    }
}

#[async_trait]
impl AuditLogger for InMemoryAuditLogger {
    async fn log(&self, entry: AuditLog) -> AuditResult<()> {
        let mut logs = self.logs.write();

        if self.max_entries > 0 && logs.len() >= self.max_entries {
            logs.remove(0);
        }

        logs.push(entry);
        Ok(())
    }

    async fn log_batch(&self, entries: Vec<AuditLog>) -> AuditResult<()> {
        let mut logs = self.logs.write();

        for entry in entries {
            if self.max_entries > 0 && logs.len() >= self.max_entries {
                logs.remove(0);
            }
            logs.push(entry);
        }

        Ok(())
    }

    async fn query(&self, filter: AuditFilter) -> AuditResult<Vec<AuditLog>> {
        let logs = self.logs.read();
        let mut results: Vec<AuditLog> =
            logs.iter().filter(|log| filter.matches(log)).cloned().collect();

        if filter.descending {
            results.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        } else {
            results.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        }

        if let Some(offset) = filter.offset {
            results = results.into_iter().skip(offset).collect();
        }

        if let Some(limit) = filter.limit {
            results.truncate(limit);
        }

        Ok(results)
    }

    async fn flush(&self) -> AuditResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn supports_query(&self) -> bool {
        true
    }

    async fn health_check(&self) -> bool {
        true
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::types::{ActionResult, AuditResource};

    #[tokio::test]
    async fn test_memory_logger_basic() {
        let logger = InMemoryAuditLogger::new();

        assert!(logger.is_empty());

        let log = AuditLog::new(
            AuditAction::UserUpdate,
            AuditResource::user("alice"),
            ActionResult::Success,
        );

        logger.log(log).await.unwrap();

        assert_eq!(logger.len(), 1);
        assert!(!logger.is_empty());
    }

    #[tokio::test]
    async fn test_memory_logger_capacity() {
        let logger = InMemoryAuditLogger::with_capacity(5);

        for i in 0..10 {
            let log = AuditLog::new(
                AuditAction::UserUpdate,
                AuditResource::user(format!("user-{:03}", i)),
                ActionResult::Success,
            );
            logger.log(log).await.unwrap();
        }

        assert_eq!(logger.len(), 5);

        // Oldest entries were dropped, first remaining is user-005.
        let entries = logger.entries();
        assert!(entries[0].resource.resource_id.contains("user-005"));
    }

    #[tokio::test]
    async fn test_memory_logger_query() {
        let logger = InMemoryAuditLogger::new();

        logger
            .log(AuditLog::login("sudo", None, true))
            .await
            .unwrap();
        logger
            .log(AuditLog::user_updated("alice", "sudo", None))
            .await
            .unwrap();
        logger
            .log(AuditLog::login("alice", None, false))
            .await
            .unwrap();

        let logins = logger
            .query(AuditFilter::new().action(AuditAction::Login))
            .await
            .unwrap();
        assert_eq!(logins.len(), 2);

        let sudo_logs = logger.query(AuditFilter::new().user("sudo")).await.unwrap();
        assert_eq!(sudo_logs.len(), 2);

        let limited = logger.query(AuditFilter::new().limit(2)).await.unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn test_memory_logger_helpers() {
        let logger = InMemoryAuditLogger::new();

        logger
            .log(AuditLog::login("sudo", None, true))
            .await
            .unwrap();
        logger
            .log(AuditLog::login("alice", None, false))
            .await
            .unwrap();
        logger
            .log(AuditLog::favorite_added("alice", "OL82563W", None))
            .await
            .unwrap();

        assert_eq!(logger.entries_for_action(AuditAction::Login).len(), 2);
        assert_eq!(logger.security_events().len(), 2);
        assert_eq!(logger.failed_entries().len(), 1);
        assert!(logger.has_entry(|l| l.action == AuditAction::FavoriteAdd));
        assert_eq!(logger.count_where(|l| l.action == AuditAction::Login), 2);
        assert_eq!(logger.entries_for_user("alice").len(), 2);
    }

    #[tokio::test]
    async fn test_memory_logger_clone_shares_entries() {
        let logger1 = InMemoryAuditLogger::new();
        let logger2 = logger1.clone();

        logger1
            .log(AuditLog::login("sudo", None, true))
            .await
            .unwrap();

        assert_eq!(logger1.len(), 1);
        assert_eq!(logger2.len(), 1);
    }

    #[test]
    fn test_supports_query() {
        let logger = InMemoryAuditLogger::new();
        assert!(logger.supports_query());
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Audit logging for security and compliance.
//!
//! Every security-relevant operation (registrations, logins, token
//! rejections, role changes, deletions) produces an [`AuditLog`] entry.
//! Entries are delivered to an [`AuditLogger`] implementation chosen at
//! startup: a file logger with daily rotation in production, an in-memory
//! logger in tests, or a no-op logger when auditing is disabled.
//!
//! # Components
//!
//! - [`AuditLogger`]: Core trait for audit logger implementations
//! - [`AuditLog`]: Structured audit log entry with factory methods per event
//! - [`FileAuditLogger`]: JSON-lines file logger with daily rotation
//! - [`InMemoryAuditLogger`]: Queryable in-memory logger for tests
//! - [`NoOpAuditLogger`]: Discards everything
//!
//! # Example
//!
//! ```rust,ignore
//! use shelf_core::audit::{AuditLog, AuditLogger, FileAuditLogger, RotationConfig};
//!
//! let logger = FileAuditLogger::new("audit.log", RotationConfig::daily().keep(30))?;
//! logger.log(AuditLog::login("alice", client_ip, true)).await?;
//! ```

mod error;
mod file_logger;
mod memory_logger;
mod types;

// Re-export all public types
pub use error::{AuditError, AuditResult};
pub use file_logger::{FileAuditLogger, RotationConfig, RotationStrategy};
pub use memory_logger::InMemoryAuditLogger;
pub use types::{
    ActionResult, AuditAction, AuditFilter, AuditLog, AuditResource,
    AuditSeverity, SensitiveValue,
};

use async_trait::async_trait;

// =============================================================================
// Core Trait
// =============================================================================

/// Trait for audit logger implementations.
///
/// This trait defines the core interface that all audit loggers must
/// implement. It is async-first and supports both logging and querying.
#[async_trait]
pub trait AuditLogger: Send + Sync {
    /// Logs an audit entry.
    async fn log(&self, entry: AuditLog) -> AuditResult<()>;

    /// Logs multiple audit entries in a batch.
    ///
    /// The default implementation calls `log` for each entry, but
    /// implementations may override this for better performance.
    async fn log_batch(&self, entries: Vec<AuditLog>) -> AuditResult<()> {
        for entry in entries {
            self.log(entry).await?;
        }
        Ok(())
    }

    /// Queries audit logs with the given filter.
    ///
    /// Not all logger implementations support querying. The file logger
    /// returns an error; the in-memory logger provides full query support.
    async fn query(&self, filter: AuditFilter) -> AuditResult<Vec<AuditLog>>;

    /// Flushes any buffered logs.
    ///
    /// This should be called before shutdown to ensure all logs are
    /// persisted.
    async fn flush(&self) -> AuditResult<()>;

    /// Returns the logger name for identification.
    fn name(&self) -> &str {
        "audit_logger"
    }

    /// Returns `true` if this logger supports querying.
    fn supports_query(&self) -> bool {
        false
    }

    /// Returns `true` if this logger is healthy.
    async fn health_check(&self) -> bool {
        true
    }
}

// =============================================================================
// No-Op Logger
// =============================================================================

/// A no-op audit logger that discards all entries.
///
/// Used when audit logging is disabled.
#[derive(Debug, Default, Clone)]
pub struct NoOpAuditLogger;

impl NoOpAuditLogger {
    /// Creates a new no-op logger.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditLogger for NoOpAuditLogger {
    async fn log(&self, _entry: AuditLog) -> AuditResult<()> {
        Ok(())
    }

    async fn query(&self, _filter: AuditFilter) -> AuditResult<Vec<AuditLog>> {
        Ok(Vec::new())
    }

    async fn flush(&self) -> AuditResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "noop"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_logger() {
        let logger = NoOpAuditLogger::new();

        let log = AuditLog::new(
            AuditAction::UserRead,
            AuditResource::user("alice"),
            ActionResult::Success,
        );

        assert!(logger.log(log).await.is_ok());
        assert!(logger.query(AuditFilter::default()).await.unwrap().is_empty());
        assert!(logger.flush().await.is_ok());
    }

    #[tokio::test]
    async fn test_log_batch_through_trait_object() {
        let logger = InMemoryAuditLogger::new();

        let as_trait: &dyn AuditLogger = &logger;
        as_trait
            .log_batch(vec![
                AuditLog::login("alice", None, true),
                AuditLog::login("bob", None, true),
            ])
            .await
            .unwrap();

        assert_eq!(logger.len(), 2);
    }
}

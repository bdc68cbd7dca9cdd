// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! File-based audit logger with rotation support.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;

use super::error::{AuditError, AuditResult};
use super::types::{AuditFilter, AuditLog};
use super::AuditLogger;

// =============================================================================
// Rotation Configuration
// =============================================================================

/// Rotation configuration for file-based logging.
#[derive(Debug, Clone)]
pub struct RotationConfig {
    /// Rotation strategy.
    pub strategy: RotationStrategy,
    /// Number of rotated files to keep (0 = unlimited).
    pub keep_files: u32,
}

/// Rotation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationStrategy {
    /// Rotate daily at midnight UTC.
    Daily,
    /// Never rotate.
    Never,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            strategy: RotationStrategy::Daily,
            keep_files: 30,
        }
    }
}

impl RotationConfig {
    /// Creates a daily rotation config.
    pub fn daily() -> Self {
        Self::default()
    }

    /// Creates a no-rotation config.
    pub fn never() -> Self {
        Self {
            strategy: RotationStrategy::Never,
            ..Default::default()
        }
    }

    /// Sets the number of files to keep.
    pub fn keep(mut self, count: u32) -> Self {
        self.keep_files = count;
        self
    }
}

// =============================================================================
// File Audit Logger
// =============================================================================

/// File-based audit logger.
///
/// Writes one JSON object per line to the configured file, rotating daily and
/// pruning rotated files past the retention limit. Writes are synchronous
/// under a mutex; the volume of auditable events in an account service is
/// nowhere near the point where that matters.
pub struct FileAuditLogger {
    /// Base path for log files.
    base_path: PathBuf,
    /// Current writer.
    writer: Arc<Mutex<BufWriter<File>>>,
    /// Rotation configuration.
    rotation_config: RotationConfig,
    /// Date of the currently open file (for daily rotation).
    current_date: Mutex<NaiveDate>,
    /// Total logs written.
    total_logs_written: AtomicU64,
}

impl FileAuditLogger {
    /// Creates a new file-based audit logger.
    ///
    /// Parent directories are created if missing.
    pub fn new(path: impl AsRef<Path>, rotation_config: RotationConfig) -> AuditResult<Self> {
        let base_path = path.as_ref().to_path_buf();
        let now = Utc::now();
        let file_path = Self::file_path_for(&base_path, &rotation_config, now);
        let file = Self::open_file(&file_path)?;

        Ok(Self {
            base_path,
            writer: Arc::new(Mutex::new(BufWriter::new(file))),
            rotation_config,
            current_date: Mutex::new(now.date_naive()),
            total_logs_written: AtomicU64::new(0),
        })
    }

    /// Gets the file path for the given time.
    fn file_path_for(
        base_path: &Path,
        config: &RotationConfig,
        time: DateTime<Utc>,
    ) -> PathBuf {
        match config.strategy {
            RotationStrategy::Daily => {
                let stem = base_path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("audit");
                let ext = base_path
                    .extension()
                    .and_then(|s| s.to_str())
                    .unwrap_or("log");
                let parent = base_path.parent().unwrap_or(Path::new("."));
                parent.join(format!("{}-{}.{}", stem, time.format("%Y-%m-%d"), ext))
            }
            RotationStrategy::Never => base_path.to_path_buf(),
        }
    }

    fn open_file(path: &Path) -> AuditResult<File> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                AuditError::write_failed_with(format!("failed to open {}", path.display()), e)
            })
    }

    /// Rotates to a fresh file when the UTC date has changed.
    fn check_rotation(&self) -> AuditResult<()> {
        if self.rotation_config.strategy != RotationStrategy::Daily {
            return Ok(());
        }

        let now = Utc::now();
        let today = now.date_naive();

        let mut date_guard = self.current_date.lock();
        if *date_guard == today {
            return Ok(());
        }

        let new_path = Self::file_path_for(&self.base_path, &self.rotation_config, now);
        let new_file = Self::open_file(&new_path)?;

        let mut writer_guard = self.writer.lock();
        writer_guard.flush()?;
        *writer_guard = BufWriter::new(new_file);
        *date_guard = today;

        tracing::info!(path = %new_path.display(), "Rotated audit log file");

        self.cleanup_old_files()?;

        Ok(())
    }

    /// Removes rotated files past the retention limit, oldest first.
    fn cleanup_old_files(&self) -> AuditResult<()> {
        if self.rotation_config.keep_files == 0 {
            return Ok(());
        }

        let parent = self.base_path.parent().unwrap_or(Path::new("."));
        let stem = self
            .base_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("audit");

        let mut files: Vec<PathBuf> = fs::read_dir(parent)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with(stem) && n != stem)
                    .unwrap_or(false)
            })
            .collect();

        files.sort_by(|a, b| {
            let a_time = fs::metadata(a)
                .and_then(|m| m.modified())
                .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
            let b_time = fs::metadata(b)
                .and_then(|m| m.modified())
                .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
            a_time.cmp(&b_time)
        });

        let files_to_remove = files
            .len()
            .saturating_sub(self.rotation_config.keep_files as usize);
        for file in files.into_iter().take(files_to_remove) {
            if let Err(e) = fs::remove_file(&file) {
                tracing::warn!(
                    path = %file.display(),
                    error = %e,
                    "Failed to remove old audit log file"
                );
            } else {
                tracing::debug!(path = %file.display(), "Removed old audit log file");
            }
        }

        Ok(())
    }

    fn write_entry(&self, entry: &AuditLog) -> AuditResult<()> {
        let line = serde_json::to_string(entry)
            .map_err(|e| AuditError::serialization(e.to_string()))?;

        let mut writer = self.writer.lock();
        writeln!(writer, "{}", line)?;
        self.total_logs_written.fetch_add(1, Ordering::Relaxed);

        Ok(())
    }

    /// Returns the total logs written since this logger was created.
    pub fn total_logs_written(&self) -> u64 {
        self.total_logs_written.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AuditLogger for FileAuditLogger {
    async fn log(&self, entry: AuditLog) -> AuditResult<()> {
        self.check_rotation()?;
        self.write_entry(&entry)
    }

    async fn log_batch(&self, entries: Vec<AuditLog>) -> AuditResult<()> {
        self.check_rotation()?;

        let mut writer = self.writer.lock();
        for entry in &entries {
            let line = serde_json::to_string(entry)
                .map_err(|e| AuditError::serialization(e.to_string()))?;
            writeln!(writer, "{}", line)?;
        }
        self.total_logs_written
            .fetch_add(entries.len() as u64, Ordering::Relaxed);

        Ok(())
    }

    async fn query(&self, _filter: AuditFilter) -> AuditResult<Vec<AuditLog>> {
        Err(AuditError::query_not_supported("FileAuditLogger"))
    }

    async fn flush(&self) -> AuditResult<()> {
        let mut writer = self.writer.lock();
        writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }

    fn supports_query(&self) -> bool {
        false
    }

    async fn health_check(&self) -> bool {
        let mut writer = self.writer.lock();
        writer.flush().is_ok()
    }
}

impl std::fmt::Debug for FileAuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAuditLogger")
            .field("base_path", &self.base_path)
            .field("rotation_config", &self.rotation_config)
            .field(
                "total_logs_written",
                &self.total_logs_written.load(Ordering::Relaxed),
            )
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::types::{ActionResult, AuditAction, AuditResource};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_logger_creation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.log");

        let logger = FileAuditLogger::new(&path, RotationConfig::never()).unwrap();

        assert!(logger.health_check().await);
    }

    #[tokio::test]
    async fn test_file_logger_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.log");

        let logger = FileAuditLogger::new(&path, RotationConfig::never()).unwrap();

        let log = AuditLog::new(
            AuditAction::Login,
            AuditResource::user("alice"),
            ActionResult::Success,
        );

        logger.log(log).await.unwrap();
        logger.flush().await.unwrap();

        assert_eq!(logger.total_logs_written(), 1);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("alice"));
        assert!(content.contains("login"));
    }

    #[tokio::test]
    async fn test_file_logger_batch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.log");

        let logger = FileAuditLogger::new(&path, RotationConfig::never()).unwrap();

        let logs: Vec<AuditLog> = (0..10)
            .map(|i| {
                AuditLog::new(
                    AuditAction::UserUpdate,
                    AuditResource::user(format!("user-{:03}", i)),
                    ActionResult::Success,
                )
            })
            .collect();

        logger.log_batch(logs).await.unwrap();
        logger.flush().await.unwrap();

        assert_eq!(logger.total_logs_written(), 10);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 10);
    }

    #[tokio::test]
    async fn test_file_logger_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("audit.log");

        let logger = FileAuditLogger::new(&path, RotationConfig::never()).unwrap();
        logger
            .log(AuditLog::login("alice", None, true))
            .await
            .unwrap();
        logger.flush().await.unwrap();

        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_query_not_supported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.log");

        let logger = FileAuditLogger::new(&path, RotationConfig::never()).unwrap();

        let result = logger.query(AuditFilter::default()).await;
        assert!(matches!(result, Err(AuditError::QueryNotSupported { .. })));
        assert!(!logger.supports_query());
    }

    #[tokio::test]
    async fn test_daily_file_carries_date_suffix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.log");

        let logger = FileAuditLogger::new(&path, RotationConfig::daily()).unwrap();
        logger
            .log(AuditLog::login("alice", None, true))
            .await
            .unwrap();
        logger.flush().await.unwrap();

        let expected = dir
            .path()
            .join(format!("audit-{}.log", Utc::now().format("%Y-%m-%d")));
        assert!(expected.exists());
    }

    #[test]
    fn test_rotation_config() {
        let config = RotationConfig::daily().keep(7);
        assert_eq!(config.keep_files, 7);
        assert!(matches!(config.strategy, RotationStrategy::Daily));

        let never = RotationConfig::never();
        assert!(matches!(never.strategy, RotationStrategy::Never));
    }
}

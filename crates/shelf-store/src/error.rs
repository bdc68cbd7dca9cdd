// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the storage layer.
//!
//! [`StoreError`] is the single error surface of this crate. Conflict
//! variants (`DuplicateUsername`, `DuplicateFavorite`) come out of the
//! database's uniqueness guarantees, which makes the store the authority
//! on uniqueness even under concurrent writers.

use thiserror::Error;

/// Storage-related errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A user with this username already exists.
    #[error("username already taken: {username}")]
    DuplicateUsername {
        /// The username that collided.
        username: String,
    },

    /// The book is already in the user's favorites.
    #[error("book '{book_id}' is already a favorite of '{username}'")]
    DuplicateFavorite {
        /// Owner of the favorites list.
        username: String,
        /// The duplicated book identifier.
        book_id: String,
    },

    /// No user exists with this username.
    #[error("user not found: {username}")]
    UserNotFound {
        /// The username that was looked up.
        username: String,
    },

    /// No favorite exists for this user and book.
    #[error("favorite '{book_id}' not found for user '{username}'")]
    FavoriteNotFound {
        /// Owner of the favorites list.
        username: String,
        /// The book identifier that was looked up.
        book_id: String,
    },

    /// Failed to connect to or communicate with the database.
    #[error("database connection error: {message}")]
    Connection {
        /// Error detail.
        message: String,
    },

    /// A migration failed to apply.
    #[error("migration failed: {message}")]
    Migration {
        /// Error detail.
        message: String,
    },

    /// A query failed for a reason other than a constraint violation.
    #[error("query failed: {message}")]
    Query {
        /// Error detail.
        message: String,
    },

    /// A stored value could not be decoded.
    #[error("corrupt stored value: {message}")]
    Corrupt {
        /// Error detail.
        message: String,
    },
}

impl StoreError {
    /// Creates a duplicate username error.
    pub fn duplicate_username(username: impl Into<String>) -> Self {
        Self::DuplicateUsername {
            username: username.into(),
        }
    }

    /// Creates a duplicate favorite error.
    pub fn duplicate_favorite(username: impl Into<String>, book_id: impl Into<String>) -> Self {
        Self::DuplicateFavorite {
            username: username.into(),
            book_id: book_id.into(),
        }
    }

    /// Creates a user not found error.
    pub fn user_not_found(username: impl Into<String>) -> Self {
        Self::UserNotFound {
            username: username.into(),
        }
    }

    /// Creates a favorite not found error.
    pub fn favorite_not_found(username: impl Into<String>, book_id: impl Into<String>) -> Self {
        Self::FavoriteNotFound {
            username: username.into(),
            book_id: book_id.into(),
        }
    }

    /// Creates a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a migration error.
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration {
            message: message.into(),
        }
    }

    /// Creates a query error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Creates a corrupt value error.
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }

    /// Returns true if this error is a uniqueness conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateUsername { .. } | Self::DuplicateFavorite { .. }
        )
    }

    /// Returns true if this error means the target does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound { .. } | Self::FavoriteNotFound { .. }
        )
    }

    /// Returns true if retrying the operation might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Returns a short machine-readable error type string.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::DuplicateUsername { .. } => "duplicate_username",
            Self::DuplicateFavorite { .. } => "duplicate_favorite",
            Self::UserNotFound { .. } => "user_not_found",
            Self::FavoriteNotFound { .. } => "favorite_not_found",
            Self::Connection { .. } => "connection",
            Self::Migration { .. } => "migration",
            Self::Query { .. } => "query",
            Self::Corrupt { .. } => "corrupt",
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(e) => StoreError::connection(e.to_string()),
            sqlx::Error::PoolTimedOut => {
                StoreError::connection("connection pool timed out".to_string())
            }
            sqlx::Error::PoolClosed => StoreError::connection("connection pool closed".to_string()),
            sqlx::Error::ColumnDecode { index, source } => {
                StoreError::corrupt(format!("column {index} failed to decode: {source}"))
            }
            other => StoreError::query(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::migration(err.to_string())
    }
}

/// Convenience result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Tests
// =============================================================================

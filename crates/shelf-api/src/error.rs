// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API error types and handling.
//!
//! [`ApiError`] is the single error surface of the HTTP layer. Every
//! variant maps to an HTTP status and a stable machine code; the JSON body
//! a client sees carries only those plus a safe message. Internal detail
//! (SQL text, crypto errors, stack traces) goes to the server log and
//! nowhere else.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shelf_core::password::PasswordError;
use shelf_core::role::UnknownRole;
use shelf_store::StoreError;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// ApiError
// =============================================================================

/// API error type with HTTP status code mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Registration attempted with a taken username (409).
    #[error("username already taken: {username}")]
    DuplicateUser {
        /// The username that collided.
        username: String,
    },

    /// A requested role does not exist (404).
    #[error("unknown role: {name}")]
    UnknownRole {
        /// The rejected role name.
        name: String,
    },

    /// Login failed (401).
    ///
    /// Covers both "no such user" and "wrong password"; the two are
    /// deliberately indistinguishable to the caller.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Resource not found (404).
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// The book is already in the user's favorites (409).
    #[error("book already in favorites: {book_id}")]
    DuplicateFavorite {
        /// The duplicated book identifier.
        book_id: String,
    },

    /// The presented token is past its expiry (401).
    #[error("token expired")]
    TokenExpired,

    /// The presented token failed signature or structural checks (401).
    #[error("token invalid")]
    TokenInvalid,

    /// No credentials were presented where some are required (401).
    #[error("authentication required")]
    Unauthenticated,

    /// The authenticated account's role does not permit this (403).
    #[error("access denied")]
    Forbidden,

    /// Malformed request (400).
    #[error("bad request: {message}")]
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Input failed validation (400).
    #[error("validation failed: {message}")]
    Validation {
        /// Error message.
        message: String,
    },

    /// Unexpected store or crypto failure (500).
    ///
    /// The message is for the server log; clients get a generic body.
    #[error("internal error: {message}")]
    Internal {
        /// Error message, never sent to clients.
        message: String,
    },
}

impl ApiError {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a duplicate user error.
    pub fn duplicate_user(username: impl Into<String>) -> Self {
        Self::DuplicateUser {
            username: username.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::DuplicateUser { .. } | ApiError::DuplicateFavorite { .. } => {
                StatusCode::CONFLICT
            }
            ApiError::UnknownRole { .. } | ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidCredentials
            | ApiError::TokenExpired
            | ApiError::TokenInvalid
            | ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::BadRequest { .. } | ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the stable machine code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::DuplicateUser { .. } => "DUPLICATE_USER",
            ApiError::UnknownRole { .. } => "UNKNOWN_ROLE",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::DuplicateFavorite { .. } => "DUPLICATE_FAVORITE",
            ApiError::TokenExpired => "TOKEN_EXPIRED",
            ApiError::TokenInvalid => "TOKEN_INVALID",
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::Forbidden => "FORBIDDEN",
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Returns the message that is safe to show to clients.
    pub fn user_message(&self) -> String {
        match self {
            // Generic body; detail stays in the server log.
            ApiError::Internal { .. } => "internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Returns `true` if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::Internal { .. })
    }

    /// Returns `true` if this error is an authentication or authorization
    /// failure worth auditing.
    pub fn is_security_failure(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidCredentials
                | ApiError::TokenExpired
                | ApiError::TokenInvalid
                | ApiError::Unauthenticated
                | ApiError::Forbidden
        )
    }
}

// =============================================================================
// IntoResponse Implementation
// =============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if self.is_server_error() {
            tracing::error!(
                error = %self,
                error_code = error_code,
                status = %status,
                "server error"
            );
        } else {
            tracing::debug!(
                error = %self,
                error_code = error_code,
                status = %status,
                "client error"
            );
        }

        let body = ErrorResponseBody {
            error: ErrorDetails {
                code: error_code.to_string(),
                message: self.user_message(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Error Response Body
// =============================================================================

/// Error response body structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseBody {
    /// Error details.
    pub error: ErrorDetails,
}

/// Error details within the response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional error details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

// =============================================================================
// From Implementations
// =============================================================================

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername { username } => ApiError::DuplicateUser { username },
            StoreError::DuplicateFavorite { book_id, .. } => {
                ApiError::DuplicateFavorite { book_id }
            }
            StoreError::UserNotFound { username } => {
                ApiError::not_found(format!("user '{username}'"))
            }
            StoreError::FavoriteNotFound { book_id, .. } => {
                ApiError::not_found(format!("favorite '{book_id}'"))
            }
            other => ApiError::internal(other.to_string()),
        }
    }
}

impl From<UnknownRole> for ApiError {
    fn from(err: UnknownRole) -> Self {
        ApiError::UnknownRole { name: err.name }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::internal(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::bad_request(format!("invalid JSON: {err}"))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            ApiError::duplicate_user("alice").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::TokenExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::not_found("user 'ghost'").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ApiError::duplicate_user("x").error_code(), "DUPLICATE_USER");
        assert_eq!(
            ApiError::InvalidCredentials.error_code(),
            "INVALID_CREDENTIALS"
        );
        assert_eq!(ApiError::TokenExpired.error_code(), "TOKEN_EXPIRED");
        assert_eq!(ApiError::TokenInvalid.error_code(), "TOKEN_INVALID");
    }

    #[test]
    fn test_internal_detail_never_reaches_user_message() {
        let err = ApiError::internal("sqlite: table users has no column named foo");
        assert_eq!(err.user_message(), "internal server error");
        assert!(err.is_server_error());
    }

    #[test]
    fn test_invalid_credentials_message_is_uniform() {
        // One message whether the user was missing or the password wrong.
        let msg = ApiError::InvalidCredentials.user_message();
        assert!(!msg.contains("user"));
        assert!(!msg.to_lowercase().contains("exist"));
        assert_eq!(msg, "invalid username or password");
    }

    #[test]
    fn test_store_error_mapping() {
        let err: ApiError = StoreError::duplicate_username("alice").into();
        assert!(matches!(err, ApiError::DuplicateUser { .. }));

        let err: ApiError = StoreError::user_not_found("ghost").into();
        assert!(matches!(err, ApiError::NotFound { .. }));

        let err: ApiError = StoreError::connection("refused").into();
        assert!(matches!(err, ApiError::Internal { .. }));

        let err: ApiError = StoreError::duplicate_favorite("alice", "OL1W").into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_security_failures_flagged_for_audit() {
        assert!(ApiError::InvalidCredentials.is_security_failure());
        assert!(ApiError::Forbidden.is_security_failure());
        assert!(ApiError::TokenExpired.is_security_failure());
        assert!(!ApiError::duplicate_user("x").is_security_failure());
    }
}

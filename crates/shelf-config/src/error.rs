// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration error types for shelf-config.
//!
//! This module provides the error type hierarchy for configuration
//! operations including parsing, validation, and loading. Variants carry
//! enough context (file path, field name, offending value) to produce an
//! actionable message for the operator running `shelf validate`.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors.
///
/// This error type covers all possible failures during configuration
/// loading, parsing, and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("Failed to parse config file '{path}': {message}")]
    Parse {
        /// Path to the configuration file.
        path: PathBuf,
        /// Error message.
        message: String,
        /// Line number (if available).
        line: Option<usize>,
    },

    /// Configuration validation failed.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// The field that failed validation (dotted path, e.g. `security.jwt.secret`).
        field: String,
        /// Error message.
        message: String,
    },

    /// Required field is missing.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The missing field name.
        field: String,
    },

    /// File I/O error.
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Environment variable not found.
    #[error("Environment variable not found: {name}")]
    EnvVarNotFound {
        /// The environment variable name.
        name: String,
    },

    /// Invalid environment variable value.
    #[error("Invalid environment variable value for '{name}': {message}")]
    InvalidEnvVar {
        /// The environment variable name.
        name: String,
        /// Error message.
        message: String,
    },

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Value out of range.
    #[error("Value out of range for '{field}': {value} (expected {min}..{max})")]
    OutOfRange {
        /// The field name.
        field: String,
        /// The actual value.
        value: String,
        /// Minimum value.
        min: String,
        /// Maximum value.
        max: String,
    },

    /// Unsupported configuration format.
    #[error("Unsupported configuration format: {format}")]
    UnsupportedFormat {
        /// The unsupported format.
        format: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },
}

impl ConfigError {
    /// Creates a parse error.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: None,
        }
    }

    /// Creates a parse error with a line number.
    pub fn parse_at_line(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        line: usize,
    ) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: Some(line),
        }
    }

    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an environment variable not found error.
    pub fn env_var_not_found(name: impl Into<String>) -> Self {
        Self::EnvVarNotFound { name: name.into() }
    }

    /// Creates an invalid environment variable error.
    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates an out-of-range error.
    pub fn out_of_range(
        field: impl Into<String>,
        value: impl ToString,
        min: impl ToString,
        max: impl ToString,
    ) -> Self {
        Self::OutOfRange {
            field: field.into(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    /// Creates an unsupported format error.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Returns a short machine-readable error type string.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "parse",
            Self::Validation { .. } => "validation",
            Self::MissingField { .. } => "missing_field",
            Self::Io { .. } => "io",
            Self::EnvVarNotFound { .. } => "env_var_not_found",
            Self::InvalidEnvVar { .. } => "invalid_env_var",
            Self::FileNotFound { .. } => "file_not_found",
            Self::OutOfRange { .. } => "out_of_range",
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::Serialization { .. } => "serialization",
        }
    }

    /// Returns true if this error was caused by the filesystem.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::FileNotFound { .. })
    }

    /// Returns true if the operator can fix this error by editing the
    /// configuration file (as opposed to the process environment).
    pub fn is_config_file_error(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. }
                | Self::Validation { .. }
                | Self::MissingField { .. }
                | Self::OutOfRange { .. }
                | Self::UnsupportedFormat { .. }
        )
    }

    /// Returns a human-readable message suitable for CLI output.
    pub fn user_message(&self) -> String {
        match self {
            Self::Parse { path, line, .. } => match line {
                Some(n) => format!(
                    "Could not parse {} (line {}). Check the file syntax.",
                    path.display(),
                    n
                ),
                None => format!("Could not parse {}. Check the file syntax.", path.display()),
            },
            Self::Validation { field, message } => {
                format!("The value of '{}' is invalid: {}.", field, message)
            }
            Self::MissingField { field } => {
                format!("Required setting '{}' is missing from the config.", field)
            }
            Self::Io { path, .. } => {
                format!("Could not read {}. Check file permissions.", path.display())
            }
            Self::EnvVarNotFound { name } => {
                format!("Set the environment variable '{}' and retry.", name)
            }
            Self::InvalidEnvVar { name, message } => {
                format!("Environment variable '{}' is invalid: {}.", name, message)
            }
            Self::FileNotFound { path } => {
                format!("Config file {} does not exist.", path.display())
            }
            Self::OutOfRange {
                field, min, max, ..
            } => {
                format!("'{}' must be between {} and {}.", field, min, max)
            }
            Self::UnsupportedFormat { format } => {
                format!(
                    "'{}' is not a supported config format. Use yaml, toml, or json.",
                    format
                )
            }
            Self::Serialization { .. } => {
                "The configuration could not be deserialized. Check field names and types."
                    .to_string()
            }
        }
    }
}

/// Convenience result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ConfigError::parse("/etc/shelf.yaml", "unexpected token");
        let msg = err.to_string();
        assert!(msg.contains("/etc/shelf.yaml"));
        assert!(msg.contains("unexpected token"));
    }

    #[test]
    fn test_parse_error_with_line() {
        let err = ConfigError::parse_at_line("shelf.yaml", "bad indent", 42);
        match err {
            ConfigError::Parse { line, .. } => assert_eq!(line, Some(42)),
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_validation_error() {
        let err = ConfigError::validation("security.jwt.secret", "must be at least 32 bytes");
        assert_eq!(err.error_type(), "validation");
        assert!(err.to_string().contains("security.jwt.secret"));
        assert!(err.is_config_file_error());
    }

    #[test]
    fn test_missing_field_error() {
        let err = ConfigError::missing_field("database.url");
        assert!(err.to_string().contains("database.url"));
        assert_eq!(err.error_type(), "missing_field");
    }

    #[test]
    fn test_io_error_classification() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::io("shelf.yaml", io);
        assert!(err.is_io_error());
        assert!(!err.is_config_file_error());
    }

    #[test]
    fn test_file_not_found_is_io() {
        let err = ConfigError::file_not_found("/nonexistent/shelf.yaml");
        assert!(err.is_io_error());
        assert_eq!(err.error_type(), "file_not_found");
    }

    #[test]
    fn test_out_of_range_error() {
        let err = ConfigError::out_of_range("server.port", 0, 1, 65535);
        let msg = err.to_string();
        assert!(msg.contains("server.port"));
        assert!(msg.contains("65535"));
    }

    #[test]
    fn test_unsupported_format() {
        let err = ConfigError::unsupported_format("ini");
        assert!(err.to_string().contains("ini"));
        assert!(err.is_config_file_error());
    }

    #[test]
    fn test_user_message_is_actionable() {
        let err = ConfigError::validation("security.jwt.secret", "must be at least 32 bytes");
        let msg = err.user_message();
        assert!(msg.contains("security.jwt.secret"));
        assert!(msg.contains("32 bytes"));
    }

    #[test]
    fn test_env_var_errors() {
        let err = ConfigError::env_var_not_found("SHELF_JWT_SECRET");
        assert_eq!(err.error_type(), "env_var_not_found");

        let err = ConfigError::invalid_env_var("SHELF_SERVER_PORT", "expected valid port number");
        assert!(err.to_string().contains("SHELF_SERVER_PORT"));
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema definitions for Shelf.
//!
//! This module defines the complete configuration structure for the Shelf
//! authentication service, including server settings, database settings,
//! security settings, bootstrap seeding, and logging.
//!
//! # Schema Structure
//!
//! ```text
//! ShelfConfig
//! ├── service: ServiceConfig
//! ├── server: ServerConfig
//! │   └── cors: CorsConfig
//! ├── database: DatabaseConfig
//! ├── security: SecurityConfig
//! │   ├── jwt: JwtConfig
//! │   └── audit: AuditConfig
//! ├── bootstrap: BootstrapConfig
//! │   └── admin: AdminSeedConfig
//! └── logging: LoggingConfig
//! ```
//!
//! Every section has serde defaults, so a minimal config file only needs
//! the values without safe defaults: the JWT secret, and the bootstrap
//! admin password when startup seeding is enabled. Each section validates
//! itself; [`ShelfConfig::validate`] walks all of them.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

// =============================================================================
// Constants
// =============================================================================

/// Default HTTP server port.
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default JWT expiration in seconds (1 hour).
pub const DEFAULT_JWT_EXPIRATION_SECS: u64 = 3600;

/// Default SQLite database URL.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://shelf.db";

/// Minimum acceptable JWT secret length in bytes.
///
/// HS256 keys shorter than the hash output weaken the MAC, so anything
/// under 32 bytes is rejected at load time.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

/// Default number of rotated audit files to keep.
pub const DEFAULT_AUDIT_KEEP_FILES: usize = 30;

/// Default maximum request body size in bytes (1 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

// =============================================================================
// ShelfConfig (top-level)
// =============================================================================

/// Top-level configuration for the Shelf service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShelfConfig {
    /// Service identification.
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Security settings (JWT, audit).
    #[serde(default)]
    pub security: SecurityConfig,

    /// Bootstrap (admin seeding) settings.
    #[serde(default)]
    pub bootstrap: BootstrapConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ShelfConfig {
    /// Validates the entire configuration.
    ///
    /// Returns the first validation failure encountered, section by section.
    pub fn validate(&self) -> ConfigResult<()> {
        self.service.validate()?;
        self.server.validate()?;
        self.database.validate()?;
        self.security.validate()?;
        self.bootstrap.validate()?;
        Ok(())
    }
}

// =============================================================================
// ServiceConfig
// =============================================================================

/// Service identification and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Unique service instance identifier.
    #[serde(default = "default_service_id")]
    pub id: String,

    /// Human-readable service name.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Optional free-form description.
    #[serde(default)]
    pub description: String,
}

impl ServiceConfig {
    /// Validates the service configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.id.is_empty() {
            return Err(ConfigError::validation("service.id", "must not be empty"));
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            id: default_service_id(),
            name: default_service_name(),
            description: String::new(),
        }
    }
}

fn default_service_id() -> String {
    "shelf-01".to_string()
}

fn default_service_name() -> String {
    "Shelf".to_string()
}

// =============================================================================
// ServerConfig
// =============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port to listen on.
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// CORS settings.
    #[serde(default)]
    pub cors: CorsConfig,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size_bytes: usize,
}

impl ServerConfig {
    /// Validates the server configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.port == 0 {
            return Err(ConfigError::out_of_range("server.port", 0, 1, 65535));
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ConfigError::out_of_range(
                "server.request_timeout_secs",
                self.request_timeout_secs,
                1,
                300,
            ));
        }
        if self.max_body_size_bytes < 1024 {
            return Err(ConfigError::validation(
                "server.max_body_size_bytes",
                "must be at least 1024 bytes",
            ));
        }
        self.cors.validate()?;
        Ok(())
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|_| {
                ConfigError::validation(
                    "server.bind_address",
                    format!("'{}' is not a valid bind address", self.bind_address),
                )
            })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_server_port(),
            cors: CorsConfig::default(),
            request_timeout_secs: default_request_timeout(),
            max_body_size_bytes: default_max_body_size(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    DEFAULT_SERVER_PORT
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_body_size() -> usize {
    DEFAULT_MAX_BODY_SIZE
}

// =============================================================================
// CorsConfig
// =============================================================================

/// CORS settings for the HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Whether CORS headers are emitted.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Allowed origins. `*` allows any origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Allowed HTTP methods.
    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: Vec<String>,

    /// Allowed request headers.
    #[serde(default = "default_allowed_headers")]
    pub allowed_headers: Vec<String>,

    /// Preflight cache duration in seconds.
    #[serde(default = "default_cors_max_age")]
    pub max_age_secs: u64,
}

impl CorsConfig {
    /// Validates the CORS configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.enabled && self.allowed_origins.is_empty() {
            return Err(ConfigError::validation(
                "server.cors.allowed_origins",
                "must not be empty when CORS is enabled",
            ));
        }
        Ok(())
    }

    /// Returns true if any origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: default_allowed_origins(),
            allowed_methods: default_allowed_methods(),
            allowed_headers: default_allowed_headers(),
            max_age_secs: default_cors_max_age(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_allowed_methods() -> Vec<String> {
    vec![
        "GET".to_string(),
        "POST".to_string(),
        "PUT".to_string(),
        "DELETE".to_string(),
    ]
}

fn default_allowed_headers() -> Vec<String> {
    vec!["Authorization".to_string(), "Content-Type".to_string()]
}

fn default_cors_max_age() -> u64 {
    3600
}

// =============================================================================
// DatabaseConfig
// =============================================================================

/// SQLite database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database URL, e.g. `sqlite://shelf.db` or `sqlite::memory:`.
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquire timeout in seconds.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Whether to run pending migrations on startup.
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    /// Validates the database configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.url.is_empty() {
            return Err(ConfigError::missing_field("database.url"));
        }
        if !self.url.starts_with("sqlite:") {
            return Err(ConfigError::validation(
                "database.url",
                "only sqlite: URLs are supported",
            ));
        }
        if self.max_connections == 0 || self.max_connections > 64 {
            return Err(ConfigError::out_of_range(
                "database.max_connections",
                self.max_connections,
                1,
                64,
            ));
        }
        if self.acquire_timeout_secs == 0 || self.acquire_timeout_secs > 60 {
            return Err(ConfigError::out_of_range(
                "database.acquire_timeout_secs",
                self.acquire_timeout_secs,
                1,
                60,
            ));
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            run_migrations: true,
        }
    }
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    5
}

// =============================================================================
// SecurityConfig
// =============================================================================

/// Security settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityConfig {
    /// JWT signing settings.
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Audit log settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl SecurityConfig {
    /// Validates the security configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.jwt.validate()?;
        self.audit.validate()?;
        Ok(())
    }
}

// =============================================================================
// JwtConfig
// =============================================================================

/// JWT signing settings.
///
/// Tokens are always signed with HS256. The secret is the single
/// process-wide signing key; it has no default and must be at least
/// [`MIN_JWT_SECRET_BYTES`] bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JwtConfig {
    /// HMAC signing secret. Required.
    #[serde(default)]
    pub secret: Option<SecretValue>,

    /// Token lifetime in seconds.
    #[serde(default = "default_jwt_expiration")]
    pub expiration_secs: u64,

    /// Issuer claim (`iss`) stamped into every token.
    #[serde(default = "default_jwt_issuer")]
    pub issuer: String,
}

impl JwtConfig {
    /// Validates the JWT configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        match &self.secret {
            None => return Err(ConfigError::missing_field("security.jwt.secret")),
            Some(secret) => {
                if secret.raw().len() < MIN_JWT_SECRET_BYTES {
                    return Err(ConfigError::validation(
                        "security.jwt.secret",
                        format!("must be at least {} bytes", MIN_JWT_SECRET_BYTES),
                    ));
                }
            }
        }
        if self.expiration_secs < 60 || self.expiration_secs > 86400 {
            return Err(ConfigError::out_of_range(
                "security.jwt.expiration_secs",
                self.expiration_secs,
                60,
                86400,
            ));
        }
        if self.issuer.is_empty() {
            return Err(ConfigError::validation(
                "security.jwt.issuer",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            expiration_secs: default_jwt_expiration(),
            issuer: default_jwt_issuer(),
        }
    }
}

fn default_jwt_expiration() -> u64 {
    DEFAULT_JWT_EXPIRATION_SECS
}

fn default_jwt_issuer() -> String {
    "shelf".to_string()
}

// =============================================================================
// AuditConfig
// =============================================================================

/// Audit log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Whether audit logging is enabled.
    #[serde(default)]
    pub enabled: bool,

    /// Base path for audit log files.
    #[serde(default = "default_audit_path")]
    pub path: PathBuf,

    /// Rotation strategy.
    #[serde(default)]
    pub rotation: AuditRotation,

    /// Number of rotated files to keep.
    #[serde(default = "default_audit_keep_files")]
    pub keep_files: usize,
}

impl AuditConfig {
    /// Validates the audit configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.enabled && self.path.as_os_str().is_empty() {
            return Err(ConfigError::validation(
                "security.audit.path",
                "must not be empty when audit logging is enabled",
            ));
        }
        if self.keep_files == 0 {
            return Err(ConfigError::validation(
                "security.audit.keep_files",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_audit_path(),
            rotation: AuditRotation::default(),
            keep_files: default_audit_keep_files(),
        }
    }
}

fn default_audit_path() -> PathBuf {
    PathBuf::from("./logs/audit.log")
}

fn default_audit_keep_files() -> usize {
    DEFAULT_AUDIT_KEEP_FILES
}

/// Audit log rotation strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditRotation {
    /// Rotate once per day.
    #[default]
    Daily,
    /// Never rotate; one growing file.
    Never,
}

// =============================================================================
// BootstrapConfig
// =============================================================================

/// Bootstrap (admin seeding) settings.
///
/// Seeding creates the built-in roles and, if absent, the initial admin
/// account. It runs via `shelf seed`, or during startup when
/// `run_on_startup` is set. Either path is idempotent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BootstrapConfig {
    /// Whether to seed roles and the admin account during startup.
    #[serde(default)]
    pub run_on_startup: bool,

    /// Initial admin account details.
    #[serde(default)]
    pub admin: AdminSeedConfig,
}

impl BootstrapConfig {
    /// Validates the bootstrap configuration.
    ///
    /// The admin password is only required when startup seeding is
    /// enabled; `shelf seed` checks for it at invocation time instead.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.run_on_startup {
            self.admin.validate()?;
        }
        Ok(())
    }
}

/// Initial admin account details for bootstrap seeding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminSeedConfig {
    /// Admin username.
    #[serde(default = "default_admin_username")]
    pub username: String,

    /// Admin password. Required when seeding runs.
    #[serde(default)]
    pub password: Option<SecretValue>,

    /// Admin first name.
    #[serde(default)]
    pub first_name: String,

    /// Admin last name.
    #[serde(default)]
    pub last_name: String,

    /// Admin country.
    #[serde(default)]
    pub country: String,
}

impl AdminSeedConfig {
    /// Validates the admin seed configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.username.trim().is_empty() {
            return Err(ConfigError::validation(
                "bootstrap.admin.username",
                "must not be blank",
            ));
        }
        match &self.password {
            None => return Err(ConfigError::missing_field("bootstrap.admin.password")),
            Some(password) if password.is_empty() => {
                return Err(ConfigError::validation(
                    "bootstrap.admin.password",
                    "must not be empty",
                ));
            }
            Some(_) => {}
        }
        Ok(())
    }
}

impl Default for AdminSeedConfig {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            password: None,
            first_name: String::new(),
            last_name: String::new(),
            country: String::new(),
        }
    }
}

fn default_admin_username() -> String {
    "sudo".to_string()
}

// =============================================================================
// LoggingConfig
// =============================================================================

/// Logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Optional log file path. Logs go to stdout when unset.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level (most verbose).
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warn level.
    Warn,
    /// Error level (least verbose).
    Error,
}

impl LogLevel {
    /// Returns the level as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON lines.
    Json,
    /// Compact single-line text.
    Compact,
}

// =============================================================================
// SecretValue
// =============================================================================

/// A configuration value that must never appear in logs.
///
/// Wraps a plain string; `Display` and `Debug` both render `***`.
/// Deserializes transparently from a string, so config files just write
/// the value (or an environment placeholder that expands to it).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretValue(String);

impl SecretValue {
    /// Creates a new secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the underlying secret.
    ///
    /// Call sites should keep the returned slice short-lived and never
    /// log it.
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Returns true if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the secret length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretValue(***)")
    }
}

impl From<String> for SecretValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecretValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn default_true() -> bool {
    true
}

// =============================================================================
// Tests
// =============================================================================

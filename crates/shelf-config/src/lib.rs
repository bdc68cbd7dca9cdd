// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # shelf-config
//!
//! Configuration management for the Shelf authentication service.
//!
//! This crate provides configuration handling for Shelf, including schema
//! definitions, validation, multi-format loading, and environment variable
//! overrides.
//!
//! ## Features
//!
//! - **Schema Definition**: Complete configuration schema with validation
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: Override config values via `SHELF_*` variables
//! - **Secret Handling**: Secret values masked in `Debug` and `Display` output
//!
//! ## Quick Start
//!
//! ```no_run
//! use shelf_config::loader::load_config;
//!
//! // Load configuration from file
//! let config = load_config("shelf.yaml").unwrap();
//!
//! println!("Service: {}", config.service.id);
//! println!("Listening on: {}:{}", config.server.bind_address, config.server.port);
//! ```
//!
//! ## Configuration Schema
//!
//! The configuration is organized into the following sections:
//!
//! - `service` - Service identification and metadata
//! - `server` - HTTP server settings (bind address, CORS, timeouts)
//! - `database` - SQLite connection pool settings
//! - `security` - JWT signing and audit logging
//! - `bootstrap` - Initial admin account seeding
//! - `logging` - Log level and output format
//!
//! ## Environment Variables
//!
//! Configuration values can be overridden via environment variables:
//!
//! ```text
//! SHELF_SERVER_PORT=9090
//! SHELF_DATABASE_URL=sqlite:///var/lib/shelf/shelf.db
//! SHELF_JWT_SECRET=...
//! SHELF_LOG_LEVEL=debug
//! ```
//!
//! Values in config files can reference environment variables:
//!
//! ```yaml
//! security:
//!   jwt:
//!     secret: "${SHELF_JWT_SECRET}"
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod loader;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ConfigResult};
pub use schema::{
    // Top-level config
    ShelfConfig,
    ServiceConfig,
    // Server config
    ServerConfig,
    CorsConfig,
    // Database config
    DatabaseConfig,
    // Security config
    SecurityConfig,
    JwtConfig,
    AuditConfig,
    AuditRotation,
    // Bootstrap config
    BootstrapConfig,
    AdminSeedConfig,
    // Logging config
    LoggingConfig,
    LogLevel,
    LogFormat,
    // Secret value
    SecretValue,
};

pub use loader::{
    load_config, load_config_str, ConfigFormat, ConfigLoader, ConfigLoaderBuilder,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// =============================================================================
// Prelude
// =============================================================================

/// Convenience re-exports for common use cases.
pub mod prelude {
    pub use crate::error::{ConfigError, ConfigResult};
    pub use crate::loader::{load_config, ConfigLoader};
    pub use crate::schema::{JwtConfig, LogFormat, LogLevel, SecretValue, ShelfConfig};
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "shelf-config");
    }

    #[test]
    fn test_prelude_imports() {
        use prelude::*;
        let _config = ShelfConfig::default();
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # shelf-bin
//!
//! CLI binary for the Shelf account service.
//!
//! This crate provides the main binary entry point for Shelf, including:
//!
//! - CLI argument parsing with clap
//! - Service runtime orchestration
//! - Graceful shutdown handling
//! - Logging initialization
//! - Command implementations (run, validate, seed, version, etc.)
//!
//! ## Usage
//!
//! ```bash
//! # Start the server (default command)
//! shelf
//!
//! # Start with custom config
//! shelf -c /etc/shelf/config.yaml
//!
//! # Validate configuration
//! shelf validate
//!
//! # Seed the initial admin account
//! shelf seed
//!
//! # Generate a JWT signing secret
//! shelf gen-secret
//!
//! # Show version
//! shelf version
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod shutdown;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use runtime::{RuntimeBuilder, ServiceRuntime};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

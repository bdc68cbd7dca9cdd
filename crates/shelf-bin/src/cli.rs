// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! This module provides the command-line interface for Shelf using clap.
//! It supports multiple subcommands for different operations:
//!
//! - `run`: Start the API server (default)
//! - `validate`: Validate configuration file
//! - `seed`: Seed roles and the initial admin account
//! - `version`: Show version information
//! - `gen-secret`: Generate a JWT signing secret
//! - `health`: Check service health

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Shelf - book-favorites account service
///
/// Self-hosted account service with JWT authentication, role-based
/// authorization, user profiles, and favorite-book lists.
#[derive(Parser, Debug)]
#[command(
    name = "shelf",
    author = "Sylvex <contact@sylvex.io>",
    version = shelf_core::VERSION,
    about = "Shelf account service for book favorites",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "shelf.yaml",
        env = "SHELF_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        default_value = "info",
        env = "SHELF_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json, compact)
    #[arg(long, default_value = "text", env = "SHELF_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    /// Enable quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands for the Shelf CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the API server
    ///
    /// This is the default command when no subcommand is specified.
    /// It starts the HTTP server and, when configured, seeds the
    /// initial admin account first.
    Run(RunArgs),

    /// Validate the configuration file
    ///
    /// Parses and validates the configuration file without starting the
    /// server. Useful for checking configuration before deployment.
    Validate(ValidateArgs),

    /// Seed roles and the initial admin account
    ///
    /// Connects to the database and ensures the admin account from the
    /// bootstrap section exists. Safe to run repeatedly.
    Seed(SeedArgs),

    /// Show detailed version information
    Version,

    /// Generate a JWT signing secret
    ///
    /// Generates a cryptographically secure random secret suitable for
    /// `security.jwt.secret`.
    #[command(name = "gen-secret")]
    GenSecret(GenSecretArgs),

    /// Check service health
    ///
    /// Checks the configuration, database, and a running API server,
    /// and reports status.
    Health(HealthArgs),
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `run` command.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Skip bootstrap seeding even if enabled in the configuration
    #[arg(long)]
    pub skip_seed: bool,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Strict mode: treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `seed` command.
#[derive(Args, Debug, Default, Clone)]
pub struct SeedArgs {
    /// Override the admin username from the configuration
    #[arg(long)]
    pub username: Option<String>,

    /// Override the admin password from the configuration
    #[arg(long, env = "SHELF_ADMIN_PASSWORD")]
    pub password: Option<String>,
}

/// Arguments for the `gen-secret` command.
#[derive(Args, Debug, Clone)]
pub struct GenSecretArgs {
    /// Output format for the secret
    #[arg(short, long, default_value = "base64")]
    pub format: SecretFormat,

    /// Secret length in bytes before encoding
    #[arg(long, default_value = "48")]
    pub length: usize,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `health` command.
#[derive(Args, Debug, Clone)]
pub struct HealthArgs {
    /// Output format for health check results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Timeout for health checks in seconds
    #[arg(short, long, default_value = "10")]
    pub timeout: u64,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

/// Secret output encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SecretFormat {
    /// Base64 encoded
    #[default]
    Base64,
    /// Hexadecimal encoded
    Hex,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Run` if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }

    /// Check if verbose logging is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Get the effective log level based on flags.
    pub fn effective_log_level(&self) -> &str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            &self.log_level
        }
    }
}

impl Default for ValidateArgs {
    fn default() -> Self {
        Self {
            show_config: false,
            format: OutputFormat::Text,
            strict: false,
        }
    }
}

impl Default for GenSecretArgs {
    fn default() -> Self {
        Self {
            format: SecretFormat::Base64,
            length: 48,
            output: None,
        }
    }
}

impl Default for HealthArgs {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            timeout: 10,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["shelf"]);
        assert!(cli.command.is_none());
        matches!(cli.effective_command(), Commands::Run(_));
    }

    #[test]
    fn test_run_command() {
        let cli = Cli::parse_from(["shelf", "run"]);
        assert!(matches!(cli.command, Some(Commands::Run(_))));
    }

    #[test]
    fn test_run_skip_seed() {
        let cli = Cli::parse_from(["shelf", "run", "--skip-seed"]);
        if let Some(Commands::Run(args)) = cli.command {
            assert!(args.skip_seed);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::parse_from(["shelf", "validate", "--show-config"]);
        if let Some(Commands::Validate(args)) = cli.command {
            assert!(args.show_config);
        } else {
            panic!("Expected Validate command");
        }
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::parse_from(["shelf", "-c", "/etc/shelf/config.yaml"]);
        assert_eq!(cli.config, PathBuf::from("/etc/shelf/config.yaml"));
    }

    #[test]
    fn test_quiet_mode() {
        let cli = Cli::parse_from(["shelf", "-q"]);
        assert!(cli.quiet);
        assert_eq!(cli.effective_log_level(), "warn");
    }

    #[test]
    fn test_verbose_mode() {
        let cli = Cli::parse_from(["shelf", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.effective_log_level(), "debug");
    }

    #[test]
    fn test_gen_secret_command() {
        let cli = Cli::parse_from(["shelf", "gen-secret", "-f", "hex"]);
        if let Some(Commands::GenSecret(args)) = cli.command {
            assert_eq!(args.format, SecretFormat::Hex);
            assert_eq!(args.length, 48);
        } else {
            panic!("Expected GenSecret command");
        }
    }

    #[test]
    fn test_seed_command_overrides() {
        let cli = Cli::parse_from(["shelf", "seed", "--username", "root"]);
        if let Some(Commands::Seed(args)) = cli.command {
            assert_eq!(args.username.as_deref(), Some("root"));
            assert!(args.password.is_none());
        } else {
            panic!("Expected Seed command");
        }
    }
}

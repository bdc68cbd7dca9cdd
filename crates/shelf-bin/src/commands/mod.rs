// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! This module contains the implementation of all CLI commands:
//!
//! - `run`: Start the API server
//! - `validate`: Validate configuration file
//! - `seed`: Seed roles and the initial admin account
//! - `version`: Show version information
//! - `gen-secret`: Generate a JWT signing secret
//! - `health`: Check service health

mod health;
mod run;
mod secret;
mod seed;
mod validate;
mod version;

pub use health::health_check;
pub use run::run;
pub use secret::gen_secret;
pub use seed::seed;
pub use validate::validate;
pub use version::version;

use crate::cli::{Cli, Commands};
use crate::error::BinResult;

/// Executes the appropriate command based on CLI arguments.
pub async fn execute(cli: Cli) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Run(args) => run::run(&cli, args).await,
        Commands::Validate(args) => validate::validate(&cli, args),
        Commands::Seed(args) => seed::seed(&cli, args).await,
        Commands::Version => version::version(&cli),
        Commands::GenSecret(args) => secret::gen_secret(&cli, args),
        Commands::Health(args) => health::health_check(&cli, args).await,
    }
}

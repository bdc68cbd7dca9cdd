// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use crate::cli::Cli;
use crate::error::BinResult;

/// Executes the `version` command to display version information.
pub fn version(_cli: &Cli) -> BinResult<()> {
    println!("Shelf - book-favorites account service");
    println!();
    println!("Version Information:");
    println!("  shelf-bin:    {}", env!("CARGO_PKG_VERSION"));
    println!("  shelf-core:   {}", shelf_core::VERSION);
    println!("  shelf-api:    {}", shelf_api::VERSION);
    println!("  shelf-config: {}", shelf_config::VERSION);
    println!("  shelf-store:  {}", shelf_store::VERSION);
    println!();
    println!("Build Information:");
    println!("  Rust Edition: 2021");
    println!("  Target:       {}", std::env::consts::ARCH);
    println!("  OS:           {}", std::env::consts::OS);
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");
    println!();
    println!("For commercial licensing, contact: contact@sylvex.io");

    Ok(())
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `gen-secret` command.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;

use crate::cli::{Cli, GenSecretArgs, SecretFormat};
use crate::error::{BinError, BinResult};

/// Minimum secret length in bytes. HS256 keys shorter than the hash
/// output weaken the MAC.
const MIN_SECRET_BYTES: usize = 32;

/// Executes the `gen-secret` command to generate a JWT signing secret.
pub fn gen_secret(_cli: &Cli, args: GenSecretArgs) -> BinResult<()> {
    if args.length < MIN_SECRET_BYTES {
        return Err(BinError::Configuration(format!(
            "Secret length must be at least {} bytes, got {}",
            MIN_SECRET_BYTES, args.length
        )));
    }

    let mut bytes = vec![0u8; args.length];
    rand::thread_rng().fill_bytes(&mut bytes);

    let output = match args.format {
        SecretFormat::Base64 => STANDARD.encode(&bytes),
        SecretFormat::Hex => bytes.iter().map(|b| format!("{:02x}", b)).collect(),
    };

    if let Some(path) = &args.output {
        std::fs::write(path, &output)
            .map_err(|e| BinError::Io(format!("Failed to write secret file: {}", e)))?;
        eprintln!("Secret written to: {}", path.display());
    } else {
        println!("{}", output);
    }

    eprintln!();
    eprintln!("Use this value in your configuration file:");
    eprintln!("  security:");
    eprintln!("    jwt:");
    eprintln!("      secret: \"${{SHELF_JWT_SECRET}}\"");
    eprintln!("and export SHELF_JWT_SECRET=<secret> in the service environment.");

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

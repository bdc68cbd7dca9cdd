// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `seed` command.

use std::sync::Arc;

use tracing::info;

use shelf_config::SecretValue;
use shelf_core::password::Argon2Hasher;
use shelf_store::bootstrap::ensure_admin;
use shelf_store::SqliteStore;

use crate::cli::{Cli, SeedArgs};
use crate::error::{BinError, BinResult};
use crate::runtime::{admin_seed, store_config};

/// Executes the `seed` command.
///
/// Connects to the database, runs migrations, and ensures the admin
/// account from the bootstrap section exists. Idempotent: running it
/// against an already-seeded database changes nothing.
pub async fn seed(cli: &Cli, args: SeedArgs) -> BinResult<()> {
    let mut config = shelf_config::load_config(&cli.config)
        .map_err(|e| BinError::Configuration(format!("Failed to load config: {}", e)))?;

    if let Some(username) = args.username {
        config.bootstrap.admin.username = username;
    }
    if let Some(password) = args.password {
        config.bootstrap.admin.password = Some(SecretValue::new(password));
    }

    let seed = admin_seed(&config)?;

    let store = SqliteStore::connect(&store_config(&config))
        .await
        .map_err(|e| BinError::init(format!("Failed to open database: {}", e)))?;

    let hasher = Arc::new(Argon2Hasher::new());
    let report = ensure_admin(&store, hasher.as_ref(), seed).await?;

    if report.admin_created {
        info!(username = %report.admin_username, "Admin account created");
        println!("✓ Admin account created: {}", report.admin_username);
    } else {
        info!(username = %report.admin_username, "Admin account already present");
        println!("✓ Admin account already present: {}", report.admin_username);
    }

    Ok(())
}

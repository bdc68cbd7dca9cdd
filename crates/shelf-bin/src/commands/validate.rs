// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Executes the `validate` command to validate configuration.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config_path = &cli.config;

    if !config_path.exists() {
        return Err(BinError::Configuration(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    }

    let config = shelf_config::load_config(config_path)
        .map_err(|e| BinError::Configuration(format!("Configuration validation failed: {}", e)))?;

    // Collect validation warnings
    let mut warnings: Vec<String> = Vec::new();

    if config.bootstrap.run_on_startup && config.bootstrap.admin.password.is_none() {
        warnings.push("Bootstrap seeding is enabled but no admin password is configured".into());
    }

    if config.security.audit.enabled {
        if let Some(parent) = config.security.audit.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                warnings.push(format!(
                    "Audit log directory does not exist: {}",
                    parent.display()
                ));
            }
        }
    }

    if config.server.cors.allows_any_origin() {
        warnings.push("CORS allows any origin".to_string());
    }

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", config_path.display());
            println!();
            println!("Summary:");
            println!("  Service ID: {}", config.service.id);
            println!("  Service Name: {}", config.service.name);
            println!(
                "  Server: {}:{}",
                config.server.bind_address, config.server.port
            );
            println!("  Database: {}", config.database.url);
            println!(
                "  Audit: {}",
                if config.security.audit.enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            println!(
                "  Bootstrap: {}",
                if config.bootstrap.run_on_startup {
                    "enabled"
                } else {
                    "disabled"
                }
            );

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration:");
                println!(
                    "{}",
                    serde_json::to_string_pretty(&config)
                        .unwrap_or_else(|_| "(serialization error)".to_string())
                );
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "summary": {
                    "service_id": config.service.id,
                    "service_name": config.service.name,
                    "bind_address": config.server.bind_address,
                    "port": config.server.port,
                    "database_url": config.database.url,
                    "audit_enabled": config.security.audit.enabled,
                    "bootstrap_enabled": config.bootstrap.run_on_startup,
                },
                "warnings": warnings,
                "config": if args.show_config { Some(&config) } else { None },
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        }
    }

    // In strict mode, treat warnings as errors
    if args.strict && !warnings.is_empty() {
        return Err(BinError::Configuration(format!(
            "Strict mode: {} warning(s) found",
            warnings.len()
        )));
    }

    Ok(())
}

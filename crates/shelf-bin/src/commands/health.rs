// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `health` command.

use std::time::Duration;

use crate::cli::{Cli, HealthArgs, OutputFormat};
use crate::error::{BinError, BinResult};

/// Executes the `health` command to check service health.
pub async fn health_check(cli: &Cli, args: HealthArgs) -> BinResult<()> {
    let config_path = &cli.config;
    let timeout = Duration::from_secs(args.timeout);

    let config = if config_path.exists() {
        shelf_config::load_config(config_path).ok()
    } else {
        None
    };

    let mut checks = Vec::new();

    // Check 1: Configuration file
    checks.push(HealthCheck {
        name: "Configuration".to_string(),
        status: if config.is_some() {
            HealthStatus::Healthy
        } else if config_path.exists() {
            HealthStatus::Unhealthy("Configuration file is invalid".to_string())
        } else {
            HealthStatus::Unhealthy("Configuration file not found".to_string())
        },
        latency_ms: None,
    });

    // Check 2: Database file
    let db_check = if let Some(ref cfg) = config {
        HealthCheck {
            name: "Database".to_string(),
            status: database_status(&cfg.database.url),
            latency_ms: None,
        }
    } else {
        HealthCheck {
            name: "Database".to_string(),
            status: HealthStatus::Unknown,
            latency_ms: None,
        }
    };
    checks.push(db_check);

    // Check 3: API endpoint (if running)
    let api_check = if let Some(ref cfg) = config {
        let addr = format!("{}:{}", cfg.server.bind_address, cfg.server.port);
        let start = std::time::Instant::now();

        let status = match tokio::time::timeout(timeout, check_tcp_endpoint(&addr)).await {
            Ok(Ok(())) => HealthStatus::Healthy,
            Ok(Err(e)) => HealthStatus::Unhealthy(format!("Connection failed: {}", e)),
            Err(_) => HealthStatus::Unhealthy("Timeout".to_string()),
        };

        HealthCheck {
            name: "API Server".to_string(),
            status,
            latency_ms: Some(start.elapsed().as_millis() as u64),
        }
    } else {
        HealthCheck {
            name: "API Server".to_string(),
            status: HealthStatus::Unknown,
            latency_ms: None,
        }
    };
    checks.push(api_check);

    let all_healthy = checks
        .iter()
        .all(|c| matches!(c.status, HealthStatus::Healthy | HealthStatus::Warning(_)));

    match args.format {
        OutputFormat::Text => {
            println!("Shelf Health Check");
            println!("==================");
            println!();

            for check in &checks {
                let (icon, status_text) = match &check.status {
                    HealthStatus::Healthy => ("✓", "healthy".to_string()),
                    HealthStatus::Unhealthy(msg) => ("✗", format!("unhealthy: {}", msg)),
                    HealthStatus::Warning(msg) => ("⚠", format!("warning: {}", msg)),
                    HealthStatus::Unknown => ("?", "unknown".to_string()),
                };

                let latency = check
                    .latency_ms
                    .map(|ms| format!(" ({}ms)", ms))
                    .unwrap_or_default();

                println!("{} {}: {}{}", icon, check.name, status_text, latency);
            }

            println!();
            if all_healthy {
                println!("Overall: ✓ Healthy");
            } else {
                println!("Overall: ✗ Unhealthy");
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "healthy": all_healthy,
                "checks": checks.iter().map(|c| {
                    serde_json::json!({
                        "name": c.name,
                        "status": match &c.status {
                            HealthStatus::Healthy => "healthy",
                            HealthStatus::Unhealthy(_) => "unhealthy",
                            HealthStatus::Warning(_) => "warning",
                            HealthStatus::Unknown => "unknown",
                        },
                        "message": match &c.status {
                            HealthStatus::Unhealthy(msg) => Some(msg.clone()),
                            HealthStatus::Warning(msg) => Some(msg.clone()),
                            _ => None,
                        },
                        "latency_ms": c.latency_ms,
                    })
                }).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        }
    }

    if all_healthy {
        Ok(())
    } else {
        Err(BinError::Health(
            "One or more health checks failed".to_string(),
        ))
    }
}

/// Checks the SQLite database location named by a `sqlite:` URL.
fn database_status(url: &str) -> HealthStatus {
    if url.contains(":memory:") || url.contains("mode=memory") {
        return HealthStatus::Healthy;
    }

    let path = url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = std::path::Path::new(path);

    if path.exists() {
        HealthStatus::Healthy
    } else {
        HealthStatus::Warning("Database file does not exist (will be created)".to_string())
    }
}

/// Checks if a TCP endpoint accepts connections.
async fn check_tcp_endpoint(addr: &str) -> Result<(), String> {
    tokio::net::TcpStream::connect(addr)
        .await
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// Health check result.
struct HealthCheck {
    name: String,
    status: HealthStatus,
    latency_ms: Option<u64>,
}

/// Health check status.
enum HealthStatus {
    Healthy,
    Unhealthy(String),
    Warning(String),
    Unknown,
}

// =============================================================================
// Tests
// =============================================================================

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Service runtime orchestration.
//!
//! This module provides the core runtime that wires all Shelf components
//! together:
//!
//! - Configuration loading and validation
//! - Database connection and migrations
//! - Bootstrap seeding of the initial admin account
//! - API server with auth and audit middleware
//! - Graceful shutdown coordination

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use shelf_api::ApiServerBuilder;
use shelf_config::{load_config, AuditRotation, ShelfConfig};
use shelf_core::audit::{AuditLog, AuditLogger, FileAuditLogger, NoOpAuditLogger, RotationConfig};
use shelf_core::password::{Argon2Hasher, PasswordHasher};
use shelf_core::types::ProfileFields;
use shelf_store::bootstrap::ensure_admin;
use shelf_store::{AdminSeed, FavoriteStore, SqliteStore, StoreConfig, UserStore};

use crate::error::{BinError, BinResult};
use crate::shutdown::ShutdownCoordinator;

// =============================================================================
// ServiceRuntime
// =============================================================================

/// The main runtime that orchestrates all components.
///
/// The runtime is responsible for:
/// - Connecting to the database and running migrations
/// - Seeding the initial admin account when configured
/// - Starting the API server
/// - Coordinating graceful shutdown
pub struct ServiceRuntime {
    config: Arc<ShelfConfig>,
    shutdown: ShutdownCoordinator,
    skip_seed: bool,
}

impl ServiceRuntime {
    /// Creates a new runtime.
    pub fn new(config: ShelfConfig) -> Self {
        Self {
            config: Arc::new(config),
            shutdown: ShutdownCoordinator::new(),
            skip_seed: false,
        }
    }

    /// Skips bootstrap seeding even if enabled in the configuration.
    pub fn with_skip_seed(mut self, skip: bool) -> Self {
        self.skip_seed = skip;
        self
    }

    /// Returns the shutdown coordinator.
    pub fn shutdown_coordinator(&self) -> ShutdownCoordinator {
        self.shutdown.clone()
    }

    /// Runs the service until shutdown is signaled.
    pub async fn run(self) -> BinResult<()> {
        info!(
            "Starting Shelf v{} ({})",
            shelf_core::VERSION,
            self.config.service.id
        );

        let audit_logger = self.create_audit_logger()?;

        let store = Arc::new(
            SqliteStore::connect(&store_config(&self.config))
                .await
                .map_err(|e| BinError::init(format!("Failed to open database: {}", e)))?,
        );
        let users: Arc<dyn UserStore> = store.clone();
        let favorites: Arc<dyn FavoriteStore> = store;

        let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new());

        if self.config.bootstrap.run_on_startup && !self.skip_seed {
            self.seed_admin(users.as_ref(), hasher.as_ref(), audit_logger.as_ref())
                .await?;
        }

        let server = ApiServerBuilder::new()
            .config((*self.config).clone())
            .user_store(users)
            .favorite_store(favorites)
            .hasher(hasher)
            .audit_logger(audit_logger.clone())
            .build()?;

        self.log_startup(audit_logger.as_ref()).await;

        // Drive OS signal handling in the background; the server observes
        // the broadcast through its shutdown future.
        let signal = self.shutdown.shutdown_signal();
        let waiter = self.shutdown.clone();
        tokio::spawn(async move {
            waiter.wait_for_shutdown().await;
        });

        let result = server.run_with_shutdown(signal.wait()).await;

        let shutdown_log = AuditLog::system_shutdown(Some("Shutdown signal received".to_string()));
        if let Err(e) = audit_logger.log(shutdown_log).await {
            warn!("Failed to log shutdown event: {}", e);
        }
        if let Err(e) = audit_logger.flush().await {
            warn!("Failed to flush audit log: {}", e);
        }

        info!("Shelf shutdown complete");

        result.map_err(BinError::from)
    }

    /// Creates the audit logger based on configuration.
    fn create_audit_logger(&self) -> BinResult<Arc<dyn AuditLogger>> {
        let audit = &self.config.security.audit;

        if !audit.enabled {
            info!("Audit logging disabled");
            return Ok(Arc::new(NoOpAuditLogger));
        }

        let rotation = match audit.rotation {
            AuditRotation::Daily => RotationConfig {
                keep_files: audit.keep_files as u32,
                ..RotationConfig::daily()
            },
            AuditRotation::Never => RotationConfig::never(),
        };

        let logger = FileAuditLogger::new(&audit.path, rotation)
            .map_err(|e| BinError::init(format!("Failed to create audit logger: {}", e)))?;

        info!("Audit logging enabled: {}", audit.path.display());
        Ok(Arc::new(logger))
    }

    /// Seeds the initial admin account from the bootstrap section.
    async fn seed_admin(
        &self,
        users: &dyn UserStore,
        hasher: &dyn PasswordHasher,
        audit_logger: &dyn AuditLogger,
    ) -> BinResult<()> {
        let seed = admin_seed(&self.config)?;
        let report = ensure_admin(users, hasher, seed).await?;

        if report.admin_created {
            info!(username = %report.admin_username, "Bootstrap admin account created");
        } else {
            info!(username = %report.admin_username, "Bootstrap admin account already present");
        }

        let log = AuditLog::bootstrap(serde_json::json!({
            "admin_username": report.admin_username,
            "admin_created": report.admin_created,
        }));
        if let Err(e) = audit_logger.log(log).await {
            warn!("Failed to log bootstrap event: {}", e);
        }

        Ok(())
    }

    /// Logs the startup event to the audit log.
    async fn log_startup(&self, audit_logger: &dyn AuditLogger) {
        let log = AuditLog::system_start(shelf_core::VERSION).with_details(serde_json::json!({
            "service_id": &self.config.service.id,
            "bind_address": &self.config.server.bind_address,
            "port": self.config.server.port,
        }));

        if let Err(e) = audit_logger.log(log).await {
            warn!("Failed to log startup event: {}", e);
        }
    }
}

// =============================================================================
// Config Mapping
// =============================================================================

/// Maps the database section of the service config onto the store config.
pub fn store_config(config: &ShelfConfig) -> StoreConfig {
    StoreConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        acquire_timeout_secs: config.database.acquire_timeout_secs,
        run_migrations: config.database.run_migrations,
    }
}

/// Builds the admin seed from the bootstrap section.
///
/// Fails when no admin password is configured; seeding must never fall
/// back to a well-known default credential.
pub fn admin_seed(config: &ShelfConfig) -> BinResult<AdminSeed> {
    let admin = &config.bootstrap.admin;

    let password = admin
        .password
        .as_ref()
        .map(|secret| secret.raw().to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            BinError::config(
                "bootstrap.admin.password is required for seeding \
                 (set it in the config file or via SHELF_ADMIN_PASSWORD)",
            )
        })?;

    Ok(
        AdminSeed::new(admin.username.as_str(), password).with_profile(ProfileFields {
            first_name: admin.first_name.clone(),
            last_name: admin.last_name.clone(),
            country: admin.country.clone(),
        }),
    )
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for constructing the service runtime.
pub struct RuntimeBuilder {
    config_path: Option<std::path::PathBuf>,
    config: Option<ShelfConfig>,
    skip_seed: bool,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self {
            config_path: None,
            config: None,
            skip_seed: false,
        }
    }

    /// Sets the configuration file path.
    pub fn config_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the configuration directly.
    pub fn config(mut self, config: ShelfConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Skips bootstrap seeding.
    pub fn skip_seed(mut self, skip: bool) -> Self {
        self.skip_seed = skip;
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> BinResult<ServiceRuntime> {
        let config = match self.config {
            Some(cfg) => cfg,
            None => {
                let path = self
                    .config_path
                    .ok_or_else(|| BinError::config("No configuration provided"))?;

                load_config(&path).map_err(|e| {
                    BinError::Configuration(format!("Failed to load config from {:?}: {}", path, e))
                })?
            }
        };

        Ok(ServiceRuntime::new(config).with_skip_seed(self.skip_seed))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

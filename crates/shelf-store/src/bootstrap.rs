// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bootstrap seeding.
//!
//! Creates the initial admin account. This is an explicit step, invoked
//! by `shelf seed` or at startup when configured, never an ambient side
//! effect of importing a module. Running it twice is safe: an existing
//! admin account is left untouched, and a concurrent seeder losing the
//! insert race is reported the same way as "already present".

use tracing::{debug, info};

use shelf_core::password::PasswordHasher;
use shelf_core::role::Role;
use shelf_core::types::{ProfileFields, Username};

use crate::error::{StoreError, StoreResult};
use crate::traits::{NewUser, UserStore};

// =============================================================================
// AdminSeed
// =============================================================================

/// The initial admin account to ensure exists.
///
/// The password arrives in plaintext from configuration and is hashed
/// here, immediately before the insert.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    /// Admin username.
    pub username: Username,
    /// Admin password, hashed before persistence.
    pub password: String,
    /// Profile fields for the admin account.
    pub profile: ProfileFields,
}

impl AdminSeed {
    /// Creates a seed with empty profile fields.
    pub fn new(username: impl Into<Username>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            profile: ProfileFields::default(),
        }
    }

    /// Sets the profile fields.
    pub fn with_profile(mut self, profile: ProfileFields) -> Self {
        self.profile = profile;
        self
    }
}

// =============================================================================
// BootstrapReport
// =============================================================================

/// What a bootstrap run actually did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    /// The admin username that was ensured.
    pub admin_username: String,
    /// Whether the admin account was created by this run.
    pub admin_created: bool,
}

// =============================================================================
// Seeding
// =============================================================================

/// Ensures the initial admin account exists.
///
/// Returns a report saying whether this run created it. Losing a creation
/// race to a concurrent seeder counts as "already present", not an error.
pub async fn ensure_admin(
    store: &dyn UserStore,
    hasher: &dyn PasswordHasher,
    seed: AdminSeed,
) -> StoreResult<BootstrapReport> {
    let admin_username = seed.username.as_str().to_string();

    if store.get(&seed.username).await?.is_some() {
        debug!(username = %admin_username, "bootstrap admin already present");
        return Ok(BootstrapReport {
            admin_username,
            admin_created: false,
        });
    }

    let hash = hasher
        .hash(&seed.password)
        .map_err(|e| StoreError::query(format!("failed to hash bootstrap password: {e}")))?;

    let new_user =
        NewUser::new(seed.username, hash, Role::Admin).with_profile(seed.profile);

    match store.create(new_user).await {
        Ok(_) => {
            info!(username = %admin_username, "bootstrap admin account created");
            Ok(BootstrapReport {
                admin_username,
                admin_created: true,
            })
        }
        Err(StoreError::DuplicateUsername { .. }) => Ok(BootstrapReport {
            admin_username,
            admin_created: false,
        }),
        Err(e) => Err(e),
    }
}

// =============================================================================
// Tests
// =============================================================================

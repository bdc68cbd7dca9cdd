// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # shelf-store
//!
//! Persistence layer for the Shelf account service.
//!
//! Two backends implement the same [`UserStore`] and [`FavoriteStore`]
//! traits with identical semantics:
//!
//! - [`SqliteStore`]: the production backend, a pooled SQLite database
//!   with migrations. Username uniqueness and referential integrity are
//!   enforced by the database itself.
//! - [`MemoryStore`]: a process-local backend for tests and development.
//!   Uniqueness is enforced under a single lock, mirroring what the
//!   database's unique index guarantees.
//!
//! The [`bootstrap`] module provides the explicit, idempotent seeding step
//! that creates the initial admin account.
//!
//! ## Example
//!
//! ```rust,ignore
//! use shelf_store::{NewUser, SqliteStore, StoreConfig, UserStore};
//!
//! let store = SqliteStore::connect(&StoreConfig::default()).await?;
//! let user = store.create(NewUser::new(username, hash, Role::User)).await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod bootstrap;
pub mod error;
pub mod memory;
pub mod sql;
pub mod traits;

// =============================================================================
// Re-exports
// =============================================================================

pub use bootstrap::{AdminSeed, BootstrapReport};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sql::SqliteStore;
pub use traits::{FavoriteStore, NewUser, StoreConfig, UserStore, UserUpdate};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Storage traits and interfaces.
//!
//! This module defines the abstraction over user and favorites
//! persistence. The storage layer is the single authority on username
//! uniqueness: it is enforced by the backing store on insert, not by a
//! read-then-write check in a service, so concurrent registrations of
//! the same username can never both succeed.
//!
//! # Design Principles
//!
//! - **Store-enforced uniqueness**: duplicate detection happens inside the
//!   insert, surfaced as [`StoreError::DuplicateUsername`].
//! - **Partial updates**: [`UserUpdate`] fields that are `None` keep the
//!   stored value, letting the service express "change password only" or
//!   "change role only" without round-tripping the whole row.
//! - **Async first**: all I/O operations are async.
//!
//! # Example
//!
//! ```rust,ignore
//! use shelf_store::{MemoryStore, NewUser, UserStore};
//!
//! let store = MemoryStore::new();
//! let user = store.create(new_user).await?;
//! assert!(store.get(&user.username).await?.is_some());
//! ```

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use shelf_core::role::Role;
use shelf_core::types::{BookRef, Favorite, ProfileFields, User, Username};

use crate::error::StoreError;

// =============================================================================
// Store Configuration
// =============================================================================

/// Configuration for the SQLite store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database URL, e.g. `sqlite://shelf.db` or `sqlite::memory:`.
    #[serde(default = "default_url")]
    pub url: String,

    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquire timeout in seconds.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,

    /// Whether to run pending migrations when connecting.
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_url() -> String {
    "sqlite://shelf.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_run_migrations() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
            run_migrations: true,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration for testing (private in-memory database).
    pub fn for_testing() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_secs: 5,
            run_migrations: true,
        }
    }

    /// Returns true if the URL points at an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

// =============================================================================
// Write Records
// =============================================================================

/// Data required to create a user row.
///
/// The password arrives here already hashed; plaintext never reaches the
/// storage layer.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// The unique username.
    pub username: Username,
    /// Argon2id password hash (PHC string).
    pub password_hash: String,
    /// Assigned role.
    pub role: Role,
    /// Profile fields.
    pub profile: ProfileFields,
}

impl NewUser {
    /// Creates a new user record.
    pub fn new(username: Username, password_hash: impl Into<String>, role: Role) -> Self {
        Self {
            username,
            password_hash: password_hash.into(),
            role,
            profile: ProfileFields::default(),
        }
    }

    /// Sets the profile fields.
    pub fn with_profile(mut self, profile: ProfileFields) -> Self {
        self.profile = profile;
        self
    }
}

/// A partial update to an existing user.
///
/// `None` fields keep the stored value. The service layer decides what
/// goes in here; in particular, a self-service update never carries a
/// role change, while an admin update may.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// New password hash, if the password is changing.
    pub password_hash: Option<String>,
    /// New role, if the role is changing.
    pub role: Option<Role>,
    /// New first name.
    pub first_name: Option<String>,
    /// New last name.
    pub last_name: Option<String>,
    /// New country.
    pub country: Option<String>,
}

impl UserUpdate {
    /// Returns true if the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.password_hash.is_none()
            && self.role.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.country.is_none()
    }

    /// Sets the profile fields from a [`ProfileFields`] value.
    pub fn with_profile(mut self, profile: ProfileFields) -> Self {
        self.first_name = Some(profile.first_name);
        self.last_name = Some(profile.last_name);
        self.country = Some(profile.country);
        self
    }

    /// Sets the password hash.
    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }

    /// Sets the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}

// =============================================================================
// UserStore Trait
// =============================================================================

/// Persistence for user accounts.
///
/// # Implementation Requirements
///
/// - `create` MUST enforce username uniqueness atomically and return
///   [`StoreError::DuplicateUsername`] on collision.
/// - `update` and `delete` MUST return [`StoreError::UserNotFound`] when
///   the target row does not exist.
/// - Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait UserStore: Send + Sync + Debug {
    /// Creates a new user.
    ///
    /// # Returns
    ///
    /// - `Ok(User)` - the stored user, with generated id and timestamps
    /// - `Err(StoreError::DuplicateUsername)` - if the username is taken
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    /// Looks up a user by username.
    ///
    /// Returns `Ok(None)` when no such user exists; absence is not an
    /// error at this layer.
    async fn get(&self, username: &Username) -> Result<Option<User>, StoreError>;

    /// Lists all users, ordered by username.
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    /// Applies a partial update to an existing user.
    ///
    /// # Returns
    ///
    /// - `Ok(User)` - the user after the update
    /// - `Err(StoreError::UserNotFound)` - if the user does not exist
    async fn update(&self, username: &Username, update: UserUpdate) -> Result<User, StoreError>;

    /// Deletes a user and their favorites.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - the user existed and was removed
    /// - `Err(StoreError::UserNotFound)` - if the user does not exist
    async fn delete(&self, username: &Username) -> Result<(), StoreError>;

    /// Returns the total number of users.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Returns the name of this store implementation.
    fn name(&self) -> &str {
        "user-store"
    }

    /// Checks whether the store is reachable and healthy.
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// =============================================================================
// FavoriteStore Trait
// =============================================================================

/// Persistence for per-user favorite books.
///
/// A favorite is identified by the `(username, book_id)` pair, unique at
/// the store level.
#[async_trait]
pub trait FavoriteStore: Send + Sync + Debug {
    /// Adds a book to a user's favorites.
    ///
    /// # Returns
    ///
    /// - `Ok(Favorite)` - the stored favorite
    /// - `Err(StoreError::DuplicateFavorite)` - if the pair already exists
    /// - `Err(StoreError::UserNotFound)` - if the user does not exist
    async fn add(&self, username: &Username, book: BookRef) -> Result<Favorite, StoreError>;

    /// Lists a user's favorites in the order they were added.
    async fn list_for(&self, username: &Username) -> Result<Vec<Favorite>, StoreError>;

    /// Removes a book from a user's favorites.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - the favorite existed and was removed
    /// - `Err(StoreError::FavoriteNotFound)` - if no such favorite exists
    async fn remove(&self, username: &Username, book_id: &str) -> Result<(), StoreError>;

    /// Returns the number of favorites for a user.
    async fn count_for(&self, username: &Username) -> Result<u64, StoreError>;
}

// =============================================================================
// Tests
// =============================================================================

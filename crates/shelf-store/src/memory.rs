// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory store backend.
//!
//! Used by tests and local development. Both traits are served from one
//! structure behind a single `RwLock`, so the uniqueness checks inside
//! `create` and `add` are atomic with the insert, the same guarantee the
//! SQLite backend gets from its unique indexes.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use shelf_core::types::{BookRef, Favorite, User, Username};

use crate::error::{StoreError, StoreResult};
use crate::traits::{FavoriteStore, NewUser, UserStore, UserUpdate};

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory [`UserStore`] and [`FavoriteStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    /// Users keyed by username.
    users: HashMap<String, User>,
    /// Favorites in insertion order.
    favorites: Vec<Favorite>,
    next_user_id: i64,
    next_favorite_id: i64,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of users, synchronously (test helper).
    pub fn user_count(&self) -> usize {
        self.inner.read().users.len()
    }

    /// Returns the number of favorites, synchronously (test helper).
    pub fn favorite_count(&self) -> usize {
        self.inner.read().favorites.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let mut inner = self.inner.write();

        if inner.users.contains_key(user.username.as_str()) {
            return Err(StoreError::duplicate_username(user.username.as_str()));
        }

        inner.next_user_id += 1;
        let now = Utc::now();
        let stored = User {
            id: inner.next_user_id,
            username: user.username.clone(),
            password_hash: user.password_hash,
            role: user.role,
            first_name: user.profile.first_name,
            last_name: user.profile.last_name,
            country: user.profile.country,
            created_at: now,
            updated_at: now,
        };

        inner
            .users
            .insert(user.username.into_inner(), stored.clone());
        Ok(stored)
    }

    async fn get(&self, username: &Username) -> StoreResult<Option<User>> {
        Ok(self.inner.read().users.get(username.as_str()).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let mut users: Vec<User> = self.inner.read().users.values().cloned().collect();
        users.sort_by(|a, b| a.username.as_str().cmp(b.username.as_str()));
        Ok(users)
    }

    async fn update(&self, username: &Username, update: UserUpdate) -> StoreResult<User> {
        let mut inner = self.inner.write();

        let user = inner
            .users
            .get_mut(username.as_str())
            .ok_or_else(|| StoreError::user_not_found(username.as_str()))?;

        if let Some(hash) = update.password_hash {
            user.password_hash = hash;
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(first_name) = update.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name;
        }
        if let Some(country) = update.country {
            user.country = country;
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn delete(&self, username: &Username) -> StoreResult<()> {
        let mut inner = self.inner.write();

        if inner.users.remove(username.as_str()).is_none() {
            return Err(StoreError::user_not_found(username.as_str()));
        }

        // Cascade, like the foreign key in the SQLite backend.
        inner
            .favorites
            .retain(|f| f.username.as_str() != username.as_str());
        Ok(())
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.inner.read().users.len() as u64)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[async_trait]
impl FavoriteStore for MemoryStore {
    async fn add(&self, username: &Username, book: BookRef) -> StoreResult<Favorite> {
        let mut inner = self.inner.write();

        if !inner.users.contains_key(username.as_str()) {
            return Err(StoreError::user_not_found(username.as_str()));
        }
        let duplicate = inner
            .favorites
            .iter()
            .any(|f| f.username == *username && f.book.book_id == book.book_id);
        if duplicate {
            return Err(StoreError::duplicate_favorite(
                username.as_str(),
                &book.book_id,
            ));
        }

        inner.next_favorite_id += 1;
        let favorite = Favorite {
            id: inner.next_favorite_id,
            username: username.clone(),
            book,
            added_at: Utc::now(),
        };
        inner.favorites.push(favorite.clone());
        Ok(favorite)
    }

    async fn list_for(&self, username: &Username) -> StoreResult<Vec<Favorite>> {
        Ok(self
            .inner
            .read()
            .favorites
            .iter()
            .filter(|f| f.username == *username)
            .cloned()
            .collect())
    }

    async fn remove(&self, username: &Username, book_id: &str) -> StoreResult<()> {
        let mut inner = self.inner.write();

        let before = inner.favorites.len();
        inner
            .favorites
            .retain(|f| !(f.username == *username && f.book.book_id == book_id));

        if inner.favorites.len() == before {
            return Err(StoreError::favorite_not_found(username.as_str(), book_id));
        }
        Ok(())
    }

    async fn count_for(&self, username: &Username) -> StoreResult<u64> {
        Ok(self
            .inner
            .read()
            .favorites
            .iter()
            .filter(|f| f.username == *username)
            .count() as u64)
    }
}

// =============================================================================
// Tests
// =============================================================================

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! SQLite store backend.
//!
//! The production [`UserStore`]/[`FavoriteStore`] implementation. All
//! uniqueness guarantees come from the database: `users.username` and
//! `favorites (username, book_id)` carry unique indexes, and a violation
//! surfaces as the matching `Duplicate*` error. The pre-checks that
//! services perform are a fast-fail convenience, never the authority.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use shelf_core::role::Role;
use shelf_core::types::{BookRef, Favorite, User, Username};

use crate::error::{StoreError, StoreResult};
use crate::traits::{FavoriteStore, NewUser, StoreConfig, UserStore, UserUpdate};

// =============================================================================
// SqliteStore
// =============================================================================

/// SQLite-backed [`UserStore`] and [`FavoriteStore`] implementation.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connects to the database described by `config`.
    ///
    /// Runs pending migrations when configured to, then inserts the role
    /// rows (idempotently) so the `users.role` foreign key always has its
    /// targets.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| StoreError::connection(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await?;

        let store = Self { pool };

        if config.run_migrations {
            store.migrate().await?;
        }
        store.ensure_roles().await?;

        info!(url = %config.url, "connected to database");
        Ok(store)
    }

    /// Runs pending migrations.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        debug!("migrations applied");
        Ok(())
    }

    /// Inserts the closed role set into the `roles` table if absent.
    async fn ensure_roles(&self) -> StoreResult<()> {
        for role in Role::ALL {
            sqlx::query("INSERT OR IGNORE INTO roles (name) VALUES (?)")
                .bind(role.as_str())
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

// =============================================================================
// Row Mapping
// =============================================================================

fn parse_timestamp(raw: &str, column: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::corrupt(format!("{column}: {e}")))
}

fn user_from_row(row: &SqliteRow) -> StoreResult<User> {
    let role_name: String = row.try_get("role")?;
    let role = Role::parse(&role_name)
        .map_err(|e| StoreError::corrupt(format!("users.role: {e}")))?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(User {
        id: row.try_get("id")?,
        username: Username::new(row.try_get::<String, _>("username")?),
        password_hash: row.try_get("password_hash")?,
        role,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        country: row.try_get("country")?,
        created_at: parse_timestamp(&created_at, "users.created_at")?,
        updated_at: parse_timestamp(&updated_at, "users.updated_at")?,
    })
}

fn favorite_from_row(row: &SqliteRow) -> StoreResult<Favorite> {
    let added_at: String = row.try_get("added_at")?;

    Ok(Favorite {
        id: row.try_get("id")?,
        username: Username::new(row.try_get::<String, _>("username")?),
        book: BookRef {
            book_id: row.try_get("book_id")?,
            title: row.try_get("title")?,
            cover_id: row.try_get("cover_id")?,
            authors: row.try_get("authors")?,
        },
        added_at: parse_timestamp(&added_at, "favorites.added_at")?,
    })
}

/// Maps a unique-index violation to the matching conflict error.
fn map_insert_error(err: sqlx::Error, conflict: StoreError) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => conflict,
        _ => err.into(),
    }
}

// =============================================================================
// UserStore
// =============================================================================

#[async_trait]
impl UserStore for SqliteStore {
    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO users \
             (username, password_hash, role, first_name, last_name, country, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.username.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.profile.first_name)
        .bind(&user.profile.last_name)
        .bind(&user.profile.country)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_insert_error(e, StoreError::duplicate_username(user.username.as_str()))
        })?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
            first_name: user.profile.first_name,
            last_name: user.profile.last_name,
            country: user.profile.country,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get(&self, username: &Username) -> StoreResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ?")
            .bind(username.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY username")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(user_from_row).collect()
    }

    async fn update(&self, username: &Username, update: UserUpdate) -> StoreResult<User> {
        // Single statement, COALESCE per column: unset fields keep whatever
        // is stored at execution time, so concurrent partial updates cannot
        // overwrite each other with stale reads.
        let result = sqlx::query(
            "UPDATE users SET \
             password_hash = COALESCE(?, password_hash), \
             role = COALESCE(?, role), \
             first_name = COALESCE(?, first_name), \
             last_name = COALESCE(?, last_name), \
             country = COALESCE(?, country), \
             updated_at = ? WHERE username = ?",
        )
        .bind(update.password_hash)
        .bind(update.role.map(|r| r.as_str()))
        .bind(update.first_name)
        .bind(update.last_name)
        .bind(update.country)
        .bind(Utc::now().to_rfc3339())
        .bind(username.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::user_not_found(username.as_str()));
        }

        self.get(username)
            .await?
            .ok_or_else(|| StoreError::user_not_found(username.as_str()))
    }

    async fn delete(&self, username: &Username) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE username = ?")
            .bind(username.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::user_not_found(username.as_str()));
        }
        Ok(())
    }

    async fn count(&self) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    fn name(&self) -> &str {
        "sqlite"
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

// =============================================================================
// FavoriteStore
// =============================================================================

#[async_trait]
impl FavoriteStore for SqliteStore {
    async fn add(&self, username: &Username, book: BookRef) -> StoreResult<Favorite> {
        // Fast-fail with a clear error; the foreign key is the real guard.
        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE username = ?")
            .bind(username.as_str())
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(StoreError::user_not_found(username.as_str()));
        }

        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO favorites (username, book_id, title, cover_id, authors, added_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(username.as_str())
        .bind(&book.book_id)
        .bind(&book.title)
        .bind(&book.cover_id)
        .bind(&book.authors)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_insert_error(
                e,
                StoreError::duplicate_favorite(username.as_str(), &book.book_id),
            )
        })?;

        Ok(Favorite {
            id: result.last_insert_rowid(),
            username: username.clone(),
            book,
            added_at: now,
        })
    }

    async fn list_for(&self, username: &Username) -> StoreResult<Vec<Favorite>> {
        let rows = sqlx::query("SELECT * FROM favorites WHERE username = ? ORDER BY id")
            .bind(username.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(favorite_from_row).collect()
    }

    async fn remove(&self, username: &Username, book_id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM favorites WHERE username = ? AND book_id = ?")
            .bind(username.as_str())
            .bind(book_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::favorite_not_found(username.as_str(), book_id));
        }
        Ok(())
    }

    async fn count_for(&self, username: &Username) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorites WHERE username = ?")
            .bind(username.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::types::ProfileFields;

    async fn test_store() -> SqliteStore {
        SqliteStore::connect(&StoreConfig::for_testing())
            .await
            .unwrap()
    }

    fn alice() -> NewUser {
        NewUser::new(Username::new("alice"), "$argon2id$stub", Role::User).with_profile(
            ProfileFields {
                first_name: "Alice".to_string(),
                last_name: "Liddell".to_string(),
                country: "GB".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_connect_seeds_roles() {
        let store = test_store().await;

        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM roles ORDER BY name")
            .fetch_all(store.pool())
            .await
            .unwrap();
        assert_eq!(names, vec!["ADMIN".to_string(), "USER".to_string()]);
    }

    #[tokio::test]
    async fn test_create_get_roundtrip() {
        let store = test_store().await;
        let created = store.create(alice()).await.unwrap();

        let fetched = store.get(&Username::new("alice")).await.unwrap().unwrap();
        assert_eq!(fetched.username, created.username);
        assert_eq!(fetched.role, Role::User);
        assert_eq!(fetched.first_name, "Alice");
        assert_eq!(fetched.password_hash, "$argon2id$stub");
    }

    #[tokio::test]
    async fn test_unique_index_rejects_duplicate() {
        let store = test_store().await;
        store.create(alice()).await.unwrap();

        let err = store.create(alice()).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername { .. }));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_merges_partial_fields() {
        let store = test_store().await;
        store.create(alice()).await.unwrap();

        let updated = store
            .update(
                &Username::new("alice"),
                UserUpdate::default()
                    .with_role(Role::Admin)
                    .with_password_hash("$argon2id$new"),
            )
            .await
            .unwrap();

        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.password_hash, "$argon2id$new");
        assert_eq!(updated.first_name, "Alice");

        let fetched = store.get(&Username::new("alice")).await.unwrap().unwrap();
        assert_eq!(fetched.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_user() {
        let store = test_store().await;

        let err = store
            .update(&Username::new("ghost"), UserUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UserNotFound { .. }));

        let err = store.delete(&Username::new("ghost")).await.unwrap_err();
        assert!(matches!(err, StoreError::UserNotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_cascades_favorites() {
        let store = test_store().await;
        store.create(alice()).await.unwrap();
        let name = Username::new("alice");
        store.add(&name, BookRef::new("OL1W", "Dune")).await.unwrap();

        store.delete(&name).await.unwrap();
        assert_eq!(
            FavoriteStore::count_for(&store, &name).await.unwrap(),
            0,
            "favorites must go with the user"
        );
    }

    #[tokio::test]
    async fn test_favorites_roundtrip() {
        let store = test_store().await;
        store.create(alice()).await.unwrap();
        let name = Username::new("alice");

        let favorite = store
            .add(
                &name,
                BookRef::new("OL82563W", "Dune").with_authors("Frank Herbert"),
            )
            .await
            .unwrap();
        assert_eq!(favorite.book.authors, "Frank Herbert");

        let err = store
            .add(&name, BookRef::new("OL82563W", "Dune"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateFavorite { .. }));

        let listed = store.list_for(&name).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].book.cover_id.is_none());

        store.remove(&name, "OL82563W").await.unwrap();
        let err = store.remove(&name, "OL82563W").await.unwrap_err();
        assert!(matches!(err, StoreError::FavoriteNotFound { .. }));
    }

    #[tokio::test]
    async fn test_health_check() {
        let store = test_store().await;
        assert!(UserStore::health_check(&store).await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_partial_updates_keep_both_fields() {
        let store = std::sync::Arc::new(test_store().await);
        store.create(alice()).await.unwrap();

        let role_store = store.clone();
        let role_task = tokio::spawn(async move {
            role_store
                .update(
                    &Username::new("alice"),
                    UserUpdate::default().with_role(Role::Admin),
                )
                .await
        });
        let country_store = store.clone();
        let country_task = tokio::spawn(async move {
            country_store
                .update(
                    &Username::new("alice"),
                    UserUpdate {
                        country: Some("Portugal".to_string()),
                        ..UserUpdate::default()
                    },
                )
                .await
        });

        role_task.await.unwrap().unwrap();
        country_task.await.unwrap().unwrap();

        // Neither update may revert the other.
        let user = store.get(&Username::new("alice")).await.unwrap().unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.country, "Portugal");
    }

    #[tokio::test]
    async fn test_concurrent_creates_yield_single_row() {
        let store = std::sync::Arc::new(test_store().await);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move { store.create(alice()).await }));
        }

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(StoreError::DuplicateUsername { .. }) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(conflicts, 7);
        assert_eq!(store.count().await.unwrap(), 1);
    }
}

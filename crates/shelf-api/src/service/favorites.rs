// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Favorite book management.
//!
//! Favorites are scoped to the authenticated account; there is no path
//! for one account to read or edit another's list. The store only keeps
//! a reference to the book (id, title, cover, authors); the external
//! catalog stays the source of truth for everything else.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use shelf_core::types::{BookRef, Favorite};
use shelf_core::{AuditLog, AuditLogger};
use shelf_store::FavoriteStore;

use super::record;
use crate::auth::AuthContext;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// Requests
// =============================================================================

/// Request body for adding a favorite.
#[derive(Debug, Clone, Deserialize)]
pub struct AddFavoriteRequest {
    /// Catalog identifier of the book.
    pub book_id: String,
    /// Book title.
    pub title: String,
    /// Catalog cover image identifier, if any.
    #[serde(default)]
    pub cover_id: Option<String>,
    /// Display string of the authors.
    #[serde(default)]
    pub authors: String,
}

// =============================================================================
// FavoriteService
// =============================================================================

/// Favorite book operations.
#[derive(Clone)]
pub struct FavoriteService {
    favorites: Arc<dyn FavoriteStore>,
    audit: Arc<dyn AuditLogger>,
}

impl FavoriteService {
    /// Creates a new favorite service.
    pub fn new(favorites: Arc<dyn FavoriteStore>, audit: Arc<dyn AuditLogger>) -> Self {
        Self { favorites, audit }
    }

    /// Lists the caller's favorites in the order they were added.
    pub async fn list(&self, ctx: &AuthContext) -> ApiResult<Vec<Favorite>> {
        Ok(self.favorites.list_for(&ctx.username).await?)
    }

    /// Adds a book to the caller's favorites.
    ///
    /// Adding the same book twice is a conflict, enforced by the store.
    pub async fn add(&self, ctx: &AuthContext, req: AddFavoriteRequest) -> ApiResult<Favorite> {
        if req.book_id.trim().is_empty() {
            return Err(ApiError::validation("book_id must not be empty"));
        }
        if req.title.trim().is_empty() {
            return Err(ApiError::validation("title must not be empty"));
        }

        let mut book = BookRef::new(req.book_id, req.title).with_authors(req.authors);
        if let Some(cover_id) = req.cover_id {
            book = book.with_cover(cover_id);
        }

        let favorite = self.favorites.add(&ctx.username, book).await?;

        info!(
            username = %ctx.username,
            book_id = %favorite.book.book_id,
            "favorite added"
        );
        record(
            self.audit.as_ref(),
            AuditLog::favorite_added(ctx.username.as_str(), &favorite.book.book_id, ctx.client_ip),
        )
        .await;

        Ok(favorite)
    }

    /// Removes a book from the caller's favorites.
    pub async fn remove(&self, ctx: &AuthContext, book_id: &str) -> ApiResult<()> {
        self.favorites.remove(&ctx.username, book_id).await?;

        info!(username = %ctx.username, book_id = %book_id, "favorite removed");
        record(
            self.audit.as_ref(),
            AuditLog::favorite_removed(ctx.username.as_str(), book_id, ctx.client_ip),
        )
        .await;

        Ok(())
    }
}

impl std::fmt::Debug for FavoriteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoriteService").finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Claims;
    use shelf_core::role::Role;
    use shelf_core::types::Username;
    use shelf_core::InMemoryAuditLogger;
    use shelf_store::{MemoryStore, NewUser, UserStore};

    async fn fixture() -> (FavoriteService, AuthContext) {
        let store = Arc::new(MemoryStore::new());
        store
            .create(NewUser::new(Username::new("alice"), "$hash", Role::User))
            .await
            .unwrap();

        let service = FavoriteService::new(store, Arc::new(InMemoryAuditLogger::new()));
        let ctx = AuthContext::from_claims(&Claims::new("alice", Role::User, 3600, "shelf"));
        (service, ctx)
    }

    fn dune() -> AddFavoriteRequest {
        AddFavoriteRequest {
            book_id: "OL82563W".to_string(),
            title: "Dune".to_string(),
            cover_id: Some("11481354".to_string()),
            authors: "Frank Herbert".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_list_remove() {
        let (service, ctx) = fixture().await;

        let favorite = service.add(&ctx, dune()).await.unwrap();
        assert_eq!(favorite.book.title, "Dune");

        let list = service.list(&ctx).await.unwrap();
        assert_eq!(list.len(), 1);

        service.remove(&ctx, "OL82563W").await.unwrap();
        assert!(service.list(&ctx).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_add_conflicts() {
        let (service, ctx) = fixture().await;
        service.add(&ctx, dune()).await.unwrap();

        let err = service.add(&ctx, dune()).await.unwrap_err();
        assert!(matches!(err, ApiError::DuplicateFavorite { .. }));
    }

    #[tokio::test]
    async fn test_remove_missing_is_not_found() {
        let (service, ctx) = fixture().await;
        let err = service.remove(&ctx, "OL404W").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_add_validates_fields() {
        let (service, ctx) = fixture().await;

        let mut req = dune();
        req.book_id = "  ".to_string();
        assert!(matches!(
            service.add(&ctx, req).await.unwrap_err(),
            ApiError::Validation { .. }
        ));

        let mut req = dune();
        req.title = String::new();
        assert!(matches!(
            service.add(&ctx, req).await.unwrap_err(),
            ApiError::Validation { .. }
        ));
    }
}

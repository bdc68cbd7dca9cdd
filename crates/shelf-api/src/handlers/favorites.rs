// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Favorite book endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::error::ApiResult;
use crate::extractors::{Auth, ValidatedJson};
use crate::response::FavoriteListResponse;
use crate::service::AddFavoriteRequest;
use crate::state::AppState;

/// GET /api/favorites
pub async fn list(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<impl IntoResponse> {
    let favorites = state.favorite_service.list(&ctx).await?;
    Ok(Json(FavoriteListResponse::new(favorites)))
}

/// POST /api/favorites
pub async fn add(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    ValidatedJson(req): ValidatedJson<AddFavoriteRequest>,
) -> ApiResult<impl IntoResponse> {
    let favorite = state.favorite_service.add(&ctx, req).await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// DELETE /api/favorites/{book_id}
pub async fn remove(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(book_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.favorite_service.remove(&ctx, &book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

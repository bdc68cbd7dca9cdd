// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Administrative account endpoints.
//!
//! Everything under `/admin` requires the admin role; the auth layer
//! enforces that before these handlers run.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::error::ApiResult;
use crate::extractors::{Auth, UsernamePath, ValidatedJson};
use crate::response::UserListResponse;
use crate::service::AdminUpdateRequest;
use crate::state::AppState;

/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    Auth(_ctx): Auth,
) -> ApiResult<impl IntoResponse> {
    let users = state.user_service.list().await?;
    Ok(Json(UserListResponse::new(users)))
}

/// PUT /admin/update/{username}
///
/// Updates any account, role included. Unlike the self-service path this
/// does not reissue a token; the target account's next login picks up
/// the new role, or its own `/api/update` call will.
pub async fn update_user(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    UsernamePath(username): UsernamePath,
    ValidatedJson(req): ValidatedJson<AdminUpdateRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state.user_service.admin_update(&ctx, &username, req).await?;
    Ok(Json(user))
}

/// DELETE /admin/delete/{username}
///
/// Deleting an account that does not exist is a 404.
pub async fn delete_user(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    UsernamePath(username): UsernamePath,
) -> ApiResult<impl IntoResponse> {
    state.user_service.delete(&ctx, &username).await?;
    Ok(StatusCode::NO_CONTENT)
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Self-service profile endpoints.

use axum::{extract::State, response::IntoResponse, Json};

use crate::error::ApiResult;
use crate::extractors::{Auth, ValidatedJson};
use crate::response::{ProfileResponse, TokenInfo, UpdateResponse};
use crate::service::SelfUpdateRequest;
use crate::state::AppState;

/// GET /api/info
///
/// Returns the caller's stored profile alongside the claims of the token
/// that fetched it, so clients can show both and spot drift.
pub async fn info(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<impl IntoResponse> {
    let user = state.user_service.get(&ctx.username).await?;

    Ok(Json(ProfileResponse {
        user,
        token: TokenInfo::from_context(&ctx),
    }))
}

/// PUT /api/update
///
/// Updates the caller's own profile. Role changes are ignored on this
/// path; the response carries a replacement token minted from the stored
/// state.
pub async fn update(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    ValidatedJson(req): ValidatedJson<SelfUpdateRequest>,
) -> ApiResult<impl IntoResponse> {
    let (user, token) = state.user_service.self_update(&ctx, req).await?;

    Ok(Json(UpdateResponse::new(
        user,
        token,
        state.user_service.token_lifetime_secs(),
    )))
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Registration and login endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::error::ApiResult;
use crate::extractors::{ClientIp, ValidatedJson};
use crate::response::AuthResponse;
use crate::service::{LoginRequest, RegisterRequest};
use crate::state::AppState;

/// POST /auth/register
///
/// Creates an account and logs it straight in: the response carries a
/// token and the role's landing path, same shape as a login.
pub async fn register(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let outcome = state.auth_service.register(req, client_ip).await?;

    let response = AuthResponse::new(
        outcome.token,
        state.auth_service.token_lifetime_secs(),
        outcome.user,
    );
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/login
///
/// Authenticates an account and returns a JWT token.
pub async fn login(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let outcome = state.auth_service.login(req, client_ip).await?;

    let response = AuthResponse::new(
        outcome.token,
        state.auth_service.token_lifetime_secs(),
        outcome.user,
    );
    Ok(Json(response))
}

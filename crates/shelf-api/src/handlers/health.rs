// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Health check handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::response::{ComponentStatus, HealthResponse, ReadinessResponse};
use crate::state::AppState;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Simple liveness check. Returns 200 OK if the service is running.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::healthy())
}

// =============================================================================
// Readiness Check
// =============================================================================

/// GET /ready
///
/// Readiness check that verifies the store and the audit sink are
/// operational. Returns 503 while any component is down.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let mut components = Vec::new();
    let mut all_healthy = true;

    match state.users.health_check().await {
        Ok(()) => components.push(ComponentStatus::healthy(state.users.name())),
        Err(e) => {
            all_healthy = false;
            components.push(ComponentStatus::unhealthy(state.users.name(), e.to_string()));
        }
    }

    if state.audit.health_check().await {
        components.push(ComponentStatus::healthy("audit"));
    } else {
        all_healthy = false;
        components.push(ComponentStatus::unhealthy("audit", "audit sink unhealthy"));
    }

    let response = ReadinessResponse {
        ready: all_healthy,
        components,
    };

    if all_healthy {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application services.
//!
//! Services sit between the HTTP handlers and the stores. All business
//! rules live here: credential checks, role resolution, what a self-service
//! update may touch versus an administrative one, and the audit entry each
//! operation emits. Handlers stay thin; stores stay dumb.

mod auth;
mod favorites;
mod users;

pub use auth::{AuthOutcome, AuthService, LoginRequest, RegisterRequest};
pub use favorites::{AddFavoriteRequest, FavoriteService};
pub use users::{AdminUpdateRequest, SelfUpdateRequest, UserService};

use std::sync::Arc;

use shelf_core::password::PasswordHasher;
use shelf_core::AuditLog;
use shelf_core::AuditLogger;

use crate::error::{ApiError, ApiResult};

/// Hashes a password on the blocking pool.
///
/// Argon2 deliberately burns CPU; running it on an async worker thread
/// would stall every other request scheduled there.
pub(crate) async fn hash_password(
    hasher: Arc<dyn PasswordHasher>,
    password: String,
) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| ApiError::internal(format!("password hashing task failed: {e}")))?
        .map_err(ApiError::from)
}

/// Verifies a password against a stored hash on the blocking pool.
pub(crate) async fn verify_password(
    hasher: Arc<dyn PasswordHasher>,
    password: String,
    hash: String,
) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
        .await
        .map_err(|e| ApiError::internal(format!("password verification task failed: {e}")))?
        .map_err(ApiError::from)
}

/// Writes an audit entry, downgrading failures to a log line.
///
/// Audit trouble must not fail the request that triggered it.
pub(crate) async fn record(audit: &dyn AuditLogger, entry: AuditLog) {
    if let Err(e) = audit.log(entry).await {
        tracing::warn!(error = %e, "failed to write audit entry");
    }
}

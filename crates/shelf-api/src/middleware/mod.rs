// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Tower middleware for the HTTP server.
//!
//! - [`AuthLayer`]: bearer token authentication plus route authorization
//! - [`AuditLayer`]: audit entries for failed mutating requests

mod audit;
mod auth;

pub use audit::{AuditLayer, AuditMiddleware};
pub use auth::{AuthLayer, AuthMiddleware};

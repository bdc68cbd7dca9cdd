// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # shelf-api
//!
//! HTTP API server for the Shelf book-favorites service.
//!
//! This crate provides the axum server with JWT authentication,
//! role-based authorization, and audit-logging middleware, together
//! with the domain services behind each endpoint.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod service;
pub mod state;

pub use auth::{AuthContext, Claims, JwtManager, RoutePolicy};
pub use error::{ApiError, ApiResult};
pub use server::{ApiServer, ApiServerBuilder};
pub use state::{AppState, AppStateBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

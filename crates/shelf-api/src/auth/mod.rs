// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization module.
//!
//! This module provides:
//! - JWT token issuance and validation
//! - Route-level role-based access control
//! - Authentication context

mod claims;
mod context;
mod jwt;
mod rbac;

pub use claims::Claims;
pub use context::AuthContext;
pub use jwt::JwtManager;
pub use rbac::{AccessDecision, DenialReason, RoutePolicy};

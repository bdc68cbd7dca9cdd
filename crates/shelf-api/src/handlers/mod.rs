// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers for all endpoints.
//!
//! - [`health`]: liveness and readiness probes
//! - [`auth`]: registration and login
//! - [`users`]: self-service profile endpoints
//! - [`admin`]: administrative account endpoints
//! - [`favorites`]: favorite book endpoints

pub mod admin;
pub mod auth;
pub mod favorites;
pub mod health;
pub mod users;

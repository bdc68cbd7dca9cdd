// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Shelf Integration Tests
//!
//! This crate provides integration tests for the Shelf account service.
//! It includes test utilities, fixtures, and helpers designed for
//! extensibility and maintainability.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities, fixtures, and helpers
//!   - `fixtures`: Pre-built test data for consistent testing
//!   - `builders`: Builder patterns for constructing test objects
//!   - `assertions`: Custom assertion helpers
//!   - `mocks`: Mock implementations for testing
//!   - `harness`: In-process application harness for API tests
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p shelf-tests
//!
//! # Run specific test suite
//! cargo test -p shelf-tests --test integration_core
//! cargo test -p shelf-tests --test integration_store
//! cargo test -p shelf-tests --test integration_config
//! cargo test -p shelf-tests --test integration_api
//!
//! # Run with verbose output
//! cargo test -p shelf-tests -- --nocapture
//! ```
//!
//! ## Test Categories
//!
//! ### Core Tests (`integration_core.rs`)
//! - Role parsing and redirect rules
//! - Password hashing and verification
//! - Audit log construction and the in-memory logger
//!
//! ### Store Tests (`integration_store.rs`)
//! - User CRUD against the in-memory store
//! - Favorite uniqueness and removal
//! - Bootstrap admin seeding
//!
//! ### Config Tests (`integration_config.rs`)
//! - Configuration parsing (YAML, TOML, JSON)
//! - Validation rules
//! - Secret handling
//!
//! ### API Tests (`integration_api.rs`)
//! - Registration and login flows
//! - JWT validation and tamper rejection
//! - Role-based route authorization
//! - Profile updates and the self-update role rule
//! - Favorite book endpoints
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use shelf_tests::common::harness::TestApp;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let app = TestApp::new();
//!     let resp = app.register("alice").await;
//!     assert_eq!(resp.status, axum::http::StatusCode::CREATED);
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::builders::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::mocks::*;
}

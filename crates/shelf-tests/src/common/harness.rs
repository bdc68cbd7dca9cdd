// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! In-process application harness for API integration tests.
//!
//! The harness builds the full axum router with an in-memory store and
//! an in-memory audit logger, and drives it request by request through
//! `tower::ServiceExt::oneshot`. No sockets are opened; tests stay fast
//! and isolated.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use shelf_api::{ApiServer, AppState};
use shelf_config::ShelfConfig;
use shelf_core::audit::InMemoryAuditLogger;
use shelf_core::role::Role;
use shelf_store::MemoryStore;

use super::builders::RegisterBodyBuilder;
use super::fixtures::{ConfigFixtures, TEST_PASSWORD};

// =============================================================================
// TestApp
// =============================================================================

/// A fully wired application instance for integration tests.
pub struct TestApp {
    /// The application state, for direct service access.
    pub state: AppState,

    /// The router, cloned per request.
    pub router: Router,

    /// The in-memory store backing users and favorites.
    pub store: Arc<MemoryStore>,

    /// The in-memory audit logger, for asserting on audit trails.
    pub audit: Arc<InMemoryAuditLogger>,
}

impl TestApp {
    /// Creates an app with the baseline test configuration.
    pub fn new() -> Self {
        Self::with_config(ConfigFixtures::base())
    }

    /// Creates an app with a custom configuration.
    pub fn with_config(config: ShelfConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let audit = Arc::new(InMemoryAuditLogger::new());

        let state = AppState::builder()
            .config(config)
            .user_store(store.clone())
            .favorite_store(store.clone())
            .audit_logger(audit.clone())
            .build()
            .expect("failed to build test app state");

        let router = ApiServer::new(state.clone()).router();

        Self {
            state,
            router,
            store,
            audit,
        }
    }

    // =========================================================================
    // Raw Requests
    // =========================================================================

    /// Sends a request and collects the response.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .expect("failed to build request"),
            None => builder.body(Body::empty()).expect("failed to build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router errored");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }

    /// Sends a GET request.
    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, path, token, None).await
    }

    /// Sends a POST request with a JSON body.
    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, path, token, Some(body)).await
    }

    /// Sends a PUT request with a JSON body.
    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    /// Sends a DELETE request.
    pub async fn delete(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, path, token, None).await
    }

    // =========================================================================
    // Account Helpers
    // =========================================================================

    /// Registers a user with the default test password.
    pub async fn register(&self, username: &str) -> TestResponse {
        self.post(
            "/auth/register",
            None,
            RegisterBodyBuilder::new(username).build(),
        )
        .await
    }

    /// Registers a user with an explicit role string.
    pub async fn register_with_role(&self, username: &str, role: &str) -> TestResponse {
        self.post(
            "/auth/register",
            None,
            RegisterBodyBuilder::new(username).role(role).build(),
        )
        .await
    }

    /// Logs a user in.
    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.post(
            "/auth/login",
            None,
            serde_json::json!({ "username": username, "password": password }),
        )
        .await
    }

    /// Registers a user and returns a bearer token for them.
    pub async fn token_for_new_user(&self, username: &str) -> String {
        let resp = self.register(username).await;
        assert_eq!(
            resp.status,
            StatusCode::CREATED,
            "registration failed: {}",
            resp.body
        );
        resp.body["token"]
            .as_str()
            .expect("registration response carries a token")
            .to_string()
    }

    /// Registers an admin and returns a bearer token for them.
    pub async fn token_for_new_admin(&self, username: &str) -> String {
        let resp = self.register_with_role(username, "ADMIN").await;
        assert_eq!(
            resp.status,
            StatusCode::CREATED,
            "admin registration failed: {}",
            resp.body
        );
        resp.body["token"]
            .as_str()
            .expect("registration response carries a token")
            .to_string()
    }

    /// Mints a token directly, bypassing login. The account need not exist.
    pub fn mint_token(&self, username: &str, role: Role) -> String {
        self.state
            .jwt
            .issue(username, role)
            .expect("token issuance failed")
    }

    /// The default password the account helpers register with.
    pub fn default_password(&self) -> &'static str {
        TEST_PASSWORD
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TestResponse
// =============================================================================

/// A collected HTTP response.
#[derive(Debug)]
pub struct TestResponse {
    /// Response status.
    pub status: StatusCode,

    /// Parsed JSON body, or `Null` for empty bodies.
    pub body: Value,
}

impl TestResponse {
    /// Returns the machine-readable error code, if the body carries one.
    pub fn error_code(&self) -> Option<&str> {
        self.body["error"]["code"].as_str()
    }

    /// Asserts the response status.
    #[track_caller]
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "unexpected status (body: {})",
            self.body
        );
        self
    }

    /// Asserts the error code in the body.
    #[track_caller]
    pub fn assert_error_code(&self, expected: &str) -> &Self {
        assert_eq!(
            self.error_code(),
            Some(expected),
            "unexpected error code (body: {})",
            self.body
        );
        self
    }
}

// =============================================================================
// Tests
// =============================================================================

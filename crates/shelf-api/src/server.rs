// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, Method},
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use shelf_config::ShelfConfig;
use shelf_core::audit::AuditLogger;
use shelf_core::password::PasswordHasher;
use shelf_store::{FavoriteStore, UserStore};

use crate::auth::RoutePolicy;
use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::middleware::{AuditLayer, AuthLayer};
use crate::state::AppState;

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
///
/// This is the main entry point for creating and running the HTTP server.
pub struct ApiServer {
    state: AppState,
    config: Arc<ShelfConfig>,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        Self { state, config }
    }

    /// Creates the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let cors = create_cors_layer(&self.config);
        let auth = AuthLayer::new(
            self.state.jwt.clone(),
            self.state.policy.clone(),
            self.state.audit.clone(),
        );
        let audit = AuditLayer::new(self.state.audit.clone());

        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.server.request_timeout_secs,
            )))
            .layer(cors)
            .layer(auth)
            .layer(audit);

        Router::new()
            // Health endpoints (public)
            .route("/health", get(handlers::health::health))
            .route("/ready", get(handlers::health::ready))
            // Auth endpoints (public)
            .route("/auth/register", post(handlers::auth::register))
            .route("/auth/login", post(handlers::auth::login))
            // Self-service endpoints
            .route("/api/info", get(handlers::users::info))
            .route("/api/update", put(handlers::users::update))
            .route(
                "/api/favorites",
                get(handlers::favorites::list).post(handlers::favorites::add),
            )
            .route(
                "/api/favorites/{book_id}",
                delete(handlers::favorites::remove),
            )
            // Admin endpoints
            .route("/admin/users", get(handlers::admin::list_users))
            .route("/admin/update/{username}", put(handlers::admin::update_user))
            .route(
                "/admin/delete/{username}",
                delete(handlers::admin::delete_user),
            )
            // Apply middleware and state
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server.
    pub async fn run(self) -> ApiResult<()> {
        let addr = self.addr()?;
        let router = self.router();

        info!("Starting API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to bind: {}", e)))?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .map_err(|e| ApiError::internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Runs the server with graceful shutdown.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.addr()?;
        let router = self.router();

        info!("Starting API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to bind: {}", e)))?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ApiError::internal(format!("Server error: {}", e)))?;

        info!("API server shutdown complete");

        Ok(())
    }

    /// Returns the address the server will bind to.
    pub fn addr(&self) -> ApiResult<SocketAddr> {
        self.config
            .server
            .socket_addr()
            .map_err(|e| ApiError::internal(format!("Invalid bind address: {}", e)))
    }

    /// Returns the application state.
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates the CORS layer from configuration.
fn create_cors_layer(config: &ShelfConfig) -> CorsLayer {
    let cors = &config.server.cors;

    if !cors.enabled {
        return CorsLayer::new();
    }

    let mut layer = CorsLayer::new().max_age(Duration::from_secs(cors.max_age_secs));

    if cors.allows_any_origin() {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<_> = cors
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer.allow_origin(origins);
    }

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    if cors.allowed_headers.contains(&"*".to_string()) {
        layer = layer.allow_headers(Any);
    } else {
        layer = layer.allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);
    }

    layer
}

// =============================================================================
// Server Builder
// =============================================================================

/// Builder for creating the API server.
pub struct ApiServerBuilder {
    state_builder: crate::state::AppStateBuilder,
}

impl ApiServerBuilder {
    /// Creates a new server builder.
    pub fn new() -> Self {
        Self {
            state_builder: AppState::builder(),
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ShelfConfig) -> Self {
        self.state_builder = self.state_builder.config(config);
        self
    }

    /// Sets the user store.
    pub fn user_store(mut self, store: Arc<dyn UserStore>) -> Self {
        self.state_builder = self.state_builder.user_store(store);
        self
    }

    /// Sets the favorite store.
    pub fn favorite_store(mut self, store: Arc<dyn FavoriteStore>) -> Self {
        self.state_builder = self.state_builder.favorite_store(store);
        self
    }

    /// Sets the password hasher.
    pub fn hasher(mut self, hasher: Arc<dyn PasswordHasher>) -> Self {
        self.state_builder = self.state_builder.hasher(hasher);
        self
    }

    /// Sets the audit logger.
    pub fn audit_logger(mut self, logger: Arc<dyn AuditLogger>) -> Self {
        self.state_builder = self.state_builder.audit_logger(logger);
        self
    }

    /// Sets the route policy.
    pub fn policy(mut self, policy: Arc<RoutePolicy>) -> Self {
        self.state_builder = self.state_builder.policy(policy);
        self
    }

    /// Builds the server.
    pub fn build(self) -> ApiResult<ApiServer> {
        let state = self.state_builder.build()?;
        Ok(ApiServer::new(state))
    }
}

impl Default for ApiServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_config::SecretValue;
    use shelf_store::MemoryStore;

    fn test_config() -> ShelfConfig {
        let mut config = ShelfConfig::default();
        config.security.jwt.secret = Some(SecretValue::new(
            "test-secret-key-that-is-long-enough-for-hs256",
        ));
        config
    }

    fn test_server() -> ApiServer {
        let store = Arc::new(MemoryStore::new());
        ApiServerBuilder::new()
            .config(test_config())
            .user_store(store.clone())
            .favorite_store(store)
            .build()
            .unwrap()
    }

    #[test]
    fn test_server_builder() {
        let server = test_server();
        assert_eq!(server.addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_router_creation() {
        let server = test_server();
        let _router = server.router();
    }

    #[test]
    fn test_cors_layer_from_config() {
        let config = test_config();
        let _layer = create_cors_layer(&config);
    }

    #[test]
    fn test_cors_layer_disabled() {
        let mut config = test_config();
        config.server.cors.enabled = false;
        let _layer = create_cors_layer(&config);
    }
}

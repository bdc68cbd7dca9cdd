// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Audit logging middleware for failed mutations.
//!
//! The services record every successful domain event themselves, and the
//! auth layer records every denial it issues. What neither sees is a
//! mutation that reached a handler and failed: a duplicate registration,
//! a validation error, a store failure. This layer watches responses to
//! mutating requests and writes an audit entry for those failures, so the
//! trail shows attempts as well as outcomes.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::Response,
};
use tower::{Layer, Service};

use shelf_core::{
    ActionResult, AuditAction, AuditLog, AuditLogger, AuditResource, NoOpAuditLogger,
};

use crate::auth::AuthContext;

// =============================================================================
// AuditLayer
// =============================================================================

/// Layer that audits failed mutating requests.
#[derive(Clone)]
pub struct AuditLayer {
    logger: Arc<dyn AuditLogger>,
}

impl AuditLayer {
    /// Creates a new audit layer.
    pub fn new(logger: Arc<dyn AuditLogger>) -> Self {
        Self { logger }
    }

    /// Creates a no-op audit layer that doesn't log anything.
    pub fn noop() -> Self {
        Self {
            logger: Arc::new(NoOpAuditLogger),
        }
    }
}

impl<S> Layer<S> for AuditLayer {
    type Service = AuditMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuditMiddleware {
            inner,
            logger: self.logger.clone(),
        }
    }
}

// =============================================================================
// AuditMiddleware
// =============================================================================

/// Middleware recording failed mutations.
#[derive(Clone)]
pub struct AuditMiddleware<S> {
    inner: S,
    logger: Arc<dyn AuditLogger>,
}

impl<S> AuditMiddleware<S> {
    /// A mutation that failed for a reason the auth layer didn't already
    /// record.
    fn should_audit(method: &Method, status: StatusCode) -> bool {
        let mutating = matches!(
            *method,
            Method::POST | Method::PUT | Method::DELETE | Method::PATCH
        );
        let already_recorded =
            status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN;
        mutating && status.is_client_error() && !already_recorded
            || mutating && status.is_server_error()
    }

    /// Maps a request to the domain action it attempted.
    fn attempted_action(method: &Method, path: &str) -> AuditAction {
        if path.starts_with("/auth/register") {
            return AuditAction::Register;
        }
        if path.starts_with("/auth/login") {
            return AuditAction::Login;
        }
        if path.starts_with("/api/favorites") {
            return match *method {
                Method::DELETE => AuditAction::FavoriteRemove,
                _ => AuditAction::FavoriteAdd,
            };
        }
        match *method {
            Method::DELETE => AuditAction::UserDelete,
            _ => AuditAction::UserUpdate,
        }
    }
}

impl<S> Service<Request<Body>> for AuditMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let logger = self.logger.clone();
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let ctx = req.extensions().get::<AuthContext>().cloned();

        let mut inner = self.inner.clone();
        let start = Instant::now();

        Box::pin(async move {
            let response = inner.call(req).await?;
            let status = response.status();

            if Self::should_audit(&method, status) {
                let action = Self::attempted_action(&method, &path);
                let duration_ms = start.elapsed().as_millis() as u64;

                let mut log = AuditLog::new(
                    action,
                    AuditResource::api(&path),
                    ActionResult::failure(format!("HTTP {}", status.as_u16())),
                )
                .with_duration(duration_ms)
                .with_details(serde_json::json!({
                    "method": method.as_str(),
                    "path": path,
                    "status": status.as_u16(),
                }));

                if let Some(ctx) = ctx {
                    log = log
                        .with_actor(ctx.username.as_str(), ctx.client_ip)
                        .with_correlation_id(ctx.request_id);
                }

                // Fire and forget; a slow audit sink must not slow requests.
                tokio::spawn(async move {
                    if let Err(e) = logger.log(log).await {
                        tracing::warn!(error = %e, "failed to write audit entry");
                    }
                });
            }

            Ok(response)
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

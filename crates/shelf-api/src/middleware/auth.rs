// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! JWT authentication and route authorization middleware.
//!
//! One layer does both checks in order: authenticate the bearer token,
//! then ask the [`RoutePolicy`] whether the resulting context may reach
//! the path. Denials are answered uniformly, a 401 or 403 with a generic
//! body, while the precise reason (missing token, expired, bad
//! signature, wrong role) goes to the log and the audit trail only.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use uuid::Uuid;

use shelf_core::{AuditLog, AuditLogger, AuditResource};

use crate::auth::{AccessDecision, AuthContext, DenialReason, JwtManager, RoutePolicy};
use crate::error::ApiError;

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer for JWT authentication and path authorization.
#[derive(Clone)]
pub struct AuthLayer {
    jwt: JwtManager,
    policy: Arc<RoutePolicy>,
    audit: Arc<dyn AuditLogger>,
}

impl AuthLayer {
    /// Creates a new auth layer.
    pub fn new(jwt: JwtManager, policy: Arc<RoutePolicy>, audit: Arc<dyn AuditLogger>) -> Self {
        Self { jwt, policy, audit }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            jwt: self.jwt.clone(),
            policy: self.policy.clone(),
            audit: self.audit.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware applying the auth layer's checks per request.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    jwt: JwtManager,
    policy: Arc<RoutePolicy>,
    audit: Arc<dyn AuditLogger>,
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
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

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let jwt = self.jwt.clone();
        let policy = self.policy.clone();
        let audit = self.audit.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let request_id = Uuid::now_v7();
            let path = req.uri().path().to_string();

            let client_ip = req
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ci| ci.0.ip());

            // Authenticate. On a public path a missing or unusable token
            // downgrades the request to anonymous; everywhere else a bad
            // token is a denial.
            let token = extract_bearer_token(&req);
            let ctx = match token {
                None => AuthContext::anonymous(),
                Some(token) => match jwt.validate(&token) {
                    Ok(claims) => AuthContext::from_claims(&claims),
                    Err(e) => {
                        let reason = match e {
                            ApiError::TokenExpired => DenialReason::TokenExpired,
                            _ => DenialReason::TokenInvalid,
                        };
                        if policy.is_public(&path) {
                            // Public paths don't care about the bad token.
                            AuthContext::anonymous()
                        } else {
                            return Ok(deny(&audit, &path, reason, None, client_ip).await);
                        }
                    }
                },
            };

            let mut ctx = ctx.with_request_id(request_id);
            if let Some(ip) = client_ip {
                ctx = ctx.with_client_ip(ip);
            }

            // Authorize against the route policy.
            if let AccessDecision::Denied(reason) = policy.authorize(&path, &ctx) {
                let actor = (!ctx.is_anonymous()).then(|| ctx.username.as_str().to_string());
                return Ok(deny(&audit, &path, reason, actor, client_ip).await);
            }

            req.extensions_mut().insert(ctx);
            inner.call(req).await
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Builds the uniform denial response and records the precise reason.
async fn deny(
    audit: &Arc<dyn AuditLogger>,
    path: &str,
    reason: DenialReason,
    actor: Option<String>,
    client_ip: Option<std::net::IpAddr>,
) -> Response {
    tracing::debug!(
        path = path,
        reason = %reason,
        actor = actor.as_deref().unwrap_or("anonymous"),
        "request denied"
    );

    let entry = match (&actor, reason.is_forbidden()) {
        (Some(username), true) => AuditLog::access_denied(
            AuditResource::api(path),
            username.clone(),
            client_ip,
            reason.as_str(),
        ),
        _ => AuditLog::token_rejected(reason.as_str(), client_ip),
    };
    if let Err(e) = audit.log(entry).await {
        tracing::warn!(error = %e, "failed to write audit entry");
    }

    let error = if reason.is_forbidden() {
        ApiError::Forbidden
    } else {
        ApiError::Unauthenticated
    };
    error.into_response()
}

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token<B>(req: &Request<B>) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer ").map(|s| s.to_string()))
}

// =============================================================================
// Tests
// =============================================================================

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! JWT token management.
//!
//! Tokens are HMAC-signed with HS256 and that algorithm is pinned: the
//! validator refuses tokens whose header names anything else, so an
//! attacker cannot downgrade verification by editing the header.

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use shelf_core::role::Role;

use super::Claims;
use crate::error::{ApiError, ApiResult};

/// The only accepted signing algorithm.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Clock skew tolerance for `exp`/`nbf`, in seconds.
const LEEWAY_SECS: u64 = 30;

// =============================================================================
// JwtManager
// =============================================================================

/// Manager for JWT token operations.
///
/// This is the central component for issuing and validating tokens. Cheap
/// to clone; the derived keys are shared.
#[derive(Clone)]
pub struct JwtManager {
    issuer: Arc<str>,
    expiration_secs: i64,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl JwtManager {
    /// Creates a new JWT manager.
    pub fn new(
        secret: &str,
        issuer: impl Into<String>,
        expiration_secs: u64,
    ) -> ApiResult<Self> {
        if secret.is_empty() {
            return Err(ApiError::internal("JWT secret is not configured"));
        }

        let issuer: String = issuer.into();

        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.set_issuer(&[&issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.leeway = LEEWAY_SECS;
        validation.validate_aud = false;

        Ok(Self {
            issuer: issuer.into(),
            expiration_secs: expiration_secs as i64,
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
        })
    }

    /// Creates a manager from the service security configuration.
    pub fn from_config(config: &shelf_config::JwtConfig) -> ApiResult<Self> {
        let secret = config
            .secret
            .as_ref()
            .ok_or_else(|| ApiError::internal("JWT secret is not configured"))?;
        Self::new(secret.raw(), &config.issuer, config.expiration_secs)
    }

    /// Issues a token for an account.
    pub fn issue(&self, username: &str, role: Role) -> ApiResult<String> {
        let claims = Claims::new(username, role, self.expiration_secs, self.issuer.as_ref());
        self.sign(&claims)
    }

    /// Signs prepared claims.
    pub fn sign(&self, claims: &Claims) -> ApiResult<String> {
        let header = Header::new(SIGNING_ALGORITHM);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| ApiError::internal(format!("failed to sign token: {e}")))
    }

    /// Validates a token and returns its claims.
    ///
    /// Distinguishes expiry from every other failure so callers can log
    /// the precise reason; everything that is not expiry collapses into
    /// [`ApiError::TokenInvalid`].
    pub fn validate(&self, token: &str) -> ApiResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => ApiError::TokenExpired,
                _ => ApiError::TokenInvalid,
            })
    }

    /// Extracts claims from a token without verifying the signature or
    /// expiry.
    ///
    /// Diagnostic use only, such as naming the subject of an expired token
    /// in an audit entry. Never trust the result for authorization.
    pub fn decode_unverified(&self, token: &str) -> ApiResult<Claims> {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims::<&str>(&[]);
        validation.insecure_disable_signature_validation();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| ApiError::TokenInvalid)
    }

    /// Returns the token lifetime in seconds.
    pub fn expiration_secs(&self) -> i64 {
        self.expiration_secs
    }

    /// Returns the issuer stamped into tokens.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("issuer", &self.issuer)
            .field("algorithm", &SIGNING_ALGORITHM)
            .field("expiration_secs", &self.expiration_secs)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

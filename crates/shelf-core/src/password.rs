// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Password hashing contract for SHELF.
//!
//! Services depend on the [`PasswordHasher`] trait, never on a concrete
//! algorithm, so the hashing scheme can be upgraded without touching the
//! authentication flow. The default implementation is Argon2id with the
//! recommended parameters and a random per-password salt.
//!
//! Plaintext passwords exist only as transient arguments here; they are never
//! stored, logged, or echoed back in errors.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};

// =============================================================================
// Contract
// =============================================================================

/// One-way password hashing.
///
/// Implementations must be deterministic on `verify` and salted on `hash`:
/// hashing the same password twice yields different strings, and either
/// string verifies against the original password.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password into a self-describing PHC string.
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Verifies a plaintext password against a stored PHC string.
    ///
    /// Returns `Ok(false)` for a well-formed hash that does not match, and an
    /// error only when the stored hash itself is unusable.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;

    /// Returns the implementation name, for diagnostics.
    fn name(&self) -> &str;
}

/// Error produced by a [`PasswordHasher`].
///
/// Messages never contain password material.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    /// Hashing failed.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// The stored hash could not be parsed or used for verification.
    #[error("stored password hash is invalid: {0}")]
    InvalidHash(String),
}

// =============================================================================
// Argon2id implementation
// =============================================================================

/// [`PasswordHasher`] backed by Argon2id.
///
/// Uses the `argon2` crate defaults (Argon2id v19, m=19456 KiB, t=2, p=1),
/// which match the current OWASP recommendation. Hashing takes tens of
/// milliseconds on purpose; callers on async runtimes should wrap calls in
/// `spawn_blocking`.
#[derive(Debug, Default, Clone)]
pub struct Argon2Hasher {
    _private: (),
}

impl Argon2Hasher {
    /// Creates a hasher with the default Argon2id parameters.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hash(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::InvalidHash(e.to_string())),
        }
    }

    fn name(&self) -> &str {
        "argon2id"
    }
}

// =============================================================================
// Tests
// =============================================================================

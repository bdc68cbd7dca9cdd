// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # shelf-core
//!
//! Core abstractions and shared types for the SHELF account service.
//!
//! This crate provides the foundational types, traits, and utilities used
//! across all SHELF components including:
//!
//! - **Types**: Core data types like `Username`, `User`, `Favorite`
//! - **Role**: The closed role set and its parsing/redirect rules
//! - **Password**: Hashing contract and the Argon2id implementation
//! - **Audit**: Security audit logging
//!
//! ## Example
//!
//! ```rust,ignore
//! use shelf_core::password::{Argon2Hasher, PasswordHasher};
//! use shelf_core::role::Role;
//! use shelf_core::types::Username;
//!
//! let hasher = Argon2Hasher::new();
//! let hash = hasher.hash("plaintext")?;
//! assert!(hasher.verify("plaintext", &hash)?);
//!
//! let role: Role = "ROLE_ADMIN".parse()?;
//! assert_eq!(role.redirect_path(), "/admin/all-users");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Core Modules
// =============================================================================

pub mod password;
pub mod role;
pub mod types;

// =============================================================================
// Enterprise Modules
// =============================================================================

pub mod audit;

// =============================================================================
// Re-exports for convenience
// =============================================================================

pub use password::{Argon2Hasher, PasswordError, PasswordHasher};
pub use role::{Role, UnknownRole};
pub use types::{BookRef, Favorite, ProfileFields, User, Username};

// Re-export audit types
pub use audit::{
    // Core types
    ActionResult, AuditAction, AuditError, AuditFilter, AuditLog, AuditLogger,
    AuditResource, AuditSeverity, SensitiveValue,
    // Loggers
    FileAuditLogger, InMemoryAuditLogger, NoOpAuditLogger,
    // Configuration
    RotationConfig, RotationStrategy,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

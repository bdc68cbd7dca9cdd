// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role model for SHELF.
//!
//! Roles form a closed set known at compile time. The store still keeps a
//! `roles` table so accounts reference roles through a foreign key, but no
//! code path can invent a role that this enum does not know about.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Role
// =============================================================================

/// An account role.
///
/// # Examples
///
/// ```
/// use shelf_core::role::Role;
///
/// let role: Role = "ROLE_ADMIN".parse().unwrap();
/// assert_eq!(role, Role::Admin);
/// assert_eq!(role.as_str(), "ADMIN");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full administrative access, including other accounts.
    Admin,

    /// Regular account access to its own profile and favorites.
    #[default]
    User,
}

impl Role {
    /// All roles, in privilege order (highest first).
    pub const ALL: [Role; 2] = [Role::Admin, Role::User];

    /// Returns the canonical name of this role.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }

    /// Returns `true` if this role carries administrative privileges.
    #[inline]
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Returns `true` if a holder of this role satisfies `required`.
    ///
    /// Admins satisfy every requirement; regular users only their own.
    #[inline]
    pub fn satisfies(&self, required: Role) -> bool {
        match required {
            Role::Admin => self.is_admin(),
            Role::User => true,
        }
    }

    /// Returns the landing path a freshly logged-in holder of this role is
    /// pointed at.
    #[inline]
    pub fn redirect_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/all-users",
            Role::User => "/my-profile",
        }
    }

    /// Parses a role name, tolerating case differences and the legacy
    /// `ROLE_` prefix some clients still send.
    pub fn parse(name: &str) -> Result<Self, UnknownRole> {
        let normalized = name.trim().to_ascii_uppercase();
        let normalized = normalized.strip_prefix("ROLE_").unwrap_or(&normalized);
        match normalized {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            _ => Err(UnknownRole {
                name: name.trim().to_string(),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s)
    }
}

/// Error returned when a role name does not match any known role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {name}")]
pub struct UnknownRole {
    /// The rejected role name, trimmed.
    pub name: String,
}

// =============================================================================
// Tests
// =============================================================================

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Core data types for SHELF.
//!
//! This module provides the storage-agnostic account and favorite types that
//! form the foundation of all data handling in SHELF.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

use crate::role::Role;

// =============================================================================
// Identifiers
// =============================================================================

/// The canonical identifier for an account.
///
/// Usernames are unique across the whole system and stable for the life of an
/// account. All lookups, tokens, and URLs refer to accounts by username; the
/// numeric row id is a storage detail that never leaves the store layer.
///
/// # Examples
///
/// ```
/// use shelf_core::types::Username;
///
/// let name = Username::new("alice");
/// assert_eq!(name.as_str(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Creates a new username.
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the username as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the username and returns the inner string.
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns `true` if the username is empty or whitespace-only.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Username {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Username {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Accounts
// =============================================================================

/// A stored account.
///
/// The password hash rides along for credential verification but is excluded
/// from serialization so it can never leak through an API response or a log
/// line that formats the whole struct as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Storage row id. Never exposed outside the store layer.
    #[serde(skip)]
    pub id: i64,

    /// Canonical identifier.
    pub username: Username,

    /// Password hash in PHC string format. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Assigned role.
    pub role: Role,

    /// First name.
    pub first_name: String,

    /// Last name.
    pub last_name: String,

    /// Country of residence.
    pub country: String,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last modified.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Returns a redacted one-line description suitable for log output.
    pub fn describe(&self) -> String {
        format!("{} ({})", self.username, self.role)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.username, self.role)
    }
}

/// Profile fields carried alongside the credentials at registration time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileFields {
    /// First name.
    #[serde(default)]
    pub first_name: String,

    /// Last name.
    #[serde(default)]
    pub last_name: String,

    /// Country of residence.
    #[serde(default)]
    pub country: String,
}

// =============================================================================
// Favorites
// =============================================================================

/// A reference to a book in the external catalog.
///
/// SHELF stores only what it needs to render a favorites list; the catalog
/// remains the source of truth for everything else about the book.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookRef {
    /// Catalog identifier of the book (e.g. an Open Library work key).
    pub book_id: String,

    /// Title at the time the favorite was added.
    pub title: String,

    /// Catalog cover image identifier, if the book has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_id: Option<String>,

    /// Display string of the authors.
    #[serde(default)]
    pub authors: String,
}

impl BookRef {
    /// Creates a book reference with just an id and title.
    pub fn new(book_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
            title: title.into(),
            cover_id: None,
            authors: String::new(),
        }
    }

    /// Sets the cover identifier.
    pub fn with_cover(mut self, cover_id: impl Into<String>) -> Self {
        self.cover_id = Some(cover_id.into());
        self
    }

    /// Sets the authors display string.
    pub fn with_authors(mut self, authors: impl Into<String>) -> Self {
        self.authors = authors.into();
        self
    }
}

impl fmt::Display for BookRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.book_id)
    }
}

/// A book an account has marked as a favorite.
///
/// An account can favorite a given book at most once; the store enforces the
/// `(user, book)` uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    /// Storage row id. Never exposed outside the store layer.
    #[serde(skip)]
    pub id: i64,

    /// Owning account.
    pub username: Username,

    /// The favorited book.
    #[serde(flatten)]
    pub book: BookRef,

    /// When the favorite was added.
    pub added_at: DateTime<Utc>,
}

impl fmt::Display for Favorite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.username, self.book)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 7,
            username: Username::new("alice"),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            role: Role::User,
            first_name: "Alice".to_string(),
            last_name: "Example".to_string(),
            country: "Portugal".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_username() {
        let name = Username::new("alice");
        assert_eq!(name.as_str(), "alice");
        assert_eq!(format!("{}", name), "alice");
        assert!(!name.is_blank());
        assert!(Username::new("   ").is_blank());
    }

    #[test]
    fn test_username_serde_transparent() {
        let name = Username::new("bob");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"bob\"");

        let back: Username = serde_json::from_str("\"bob\"").unwrap();
        assert_eq!(back, name);
    }

    #[test]
    fn test_user_never_serializes_password_hash() {
        let user = sample_user();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("id").is_none());
        assert_eq!(json["username"], "alice");
        assert_eq!(json["role"], "USER");
    }

    #[test]
    fn test_user_display_omits_secrets() {
        let user = sample_user();
        let shown = format!("{}", user);
        assert!(shown.contains("alice"));
        assert!(!shown.contains("argon2"));
    }

    #[test]
    fn test_book_ref_builder() {
        let book = BookRef::new("OL82563W", "Dune")
            .with_cover("8474036")
            .with_authors("Frank Herbert");
        assert_eq!(book.book_id, "OL82563W");
        assert_eq!(book.cover_id.as_deref(), Some("8474036"));
        assert_eq!(book.authors, "Frank Herbert");
    }

    #[test]
    fn test_favorite_serializes_book_inline() {
        let favorite = Favorite {
            id: 1,
            username: Username::new("alice"),
            book: BookRef::new("OL82563W", "Dune"),
            added_at: Utc::now(),
        };
        let json = serde_json::to_value(&favorite).unwrap();
        assert_eq!(json["book_id"], "OL82563W");
        assert_eq!(json["title"], "Dune");
        assert!(json.get("book").is_none());
        assert!(json.get("id").is_none());
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Builders
//!
//! Builder patterns for constructing complex test objects with sensible defaults.
//!
//! ## Design Principles
//!
//! - Sensible defaults for common test scenarios
//! - Chainable methods for fluent API
//! - Clear separation between required and optional fields

use serde_json::{json, Value};

use shelf_core::role::Role;
use shelf_core::types::{BookRef, ProfileFields};
use shelf_store::NewUser;

use super::fixtures::TEST_PASSWORD;

// =============================================================================
// Register Body Builder
// =============================================================================

/// Builds JSON bodies for `POST /auth/register`.
#[derive(Debug, Clone)]
pub struct RegisterBodyBuilder {
    username: String,
    password: String,
    first_name: String,
    last_name: String,
    country: String,
    role: Option<String>,
}

impl RegisterBodyBuilder {
    /// Creates a builder for the given username with the default password.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: TEST_PASSWORD.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            country: String::new(),
            role: None,
        }
    }

    /// Sets the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Sets the profile name fields.
    pub fn name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    /// Sets the country.
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Sets the requested role string (sent verbatim).
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Builds the JSON body.
    pub fn build(self) -> Value {
        let mut body = json!({
            "username": self.username,
            "password": self.password,
            "first_name": self.first_name,
            "last_name": self.last_name,
            "country": self.country,
        });
        if let Some(role) = self.role {
            body["role"] = Value::String(role);
        }
        body
    }
}

// =============================================================================
// User Builder
// =============================================================================

/// Builds `NewUser` records for direct store insertion.
///
/// The password hash defaults to a recognizable placeholder; use the
/// harness when real verification is needed.
#[derive(Debug, Clone)]
pub struct UserBuilder {
    username: String,
    password_hash: String,
    role: Role,
    profile: ProfileFields,
}

impl UserBuilder {
    /// Creates a builder for the given username.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: "$argon2id$test-placeholder".to_string(),
            role: Role::User,
            profile: ProfileFields::default(),
        }
    }

    /// Sets the stored password hash.
    pub fn password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = hash.into();
        self
    }

    /// Sets the role.
    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Marks the account as an administrator.
    pub fn admin(self) -> Self {
        self.role(Role::Admin)
    }

    /// Sets the profile fields.
    pub fn profile(
        mut self,
        first: impl Into<String>,
        last: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        self.profile = ProfileFields {
            first_name: first.into(),
            last_name: last.into(),
            country: country.into(),
        };
        self
    }

    /// Builds the `NewUser` record.
    pub fn build(self) -> NewUser {
        NewUser::new(self.username.into(), self.password_hash, self.role)
            .with_profile(self.profile)
    }
}

// =============================================================================
// Book Builder
// =============================================================================

/// Builds `BookRef` values.
#[derive(Debug, Clone)]
pub struct BookBuilder {
    book_id: String,
    title: String,
    cover_id: Option<String>,
    authors: String,
}

impl BookBuilder {
    /// Creates a builder with an id and title.
    pub fn new(book_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
            title: title.into(),
            cover_id: None,
            authors: String::new(),
        }
    }

    /// Sets the cover identifier.
    pub fn cover(mut self, cover_id: impl Into<String>) -> Self {
        self.cover_id = Some(cover_id.into());
        self
    }

    /// Sets the authors display string.
    pub fn authors(mut self, authors: impl Into<String>) -> Self {
        self.authors = authors.into();
        self
    }

    /// Builds the `BookRef`.
    pub fn build(self) -> BookRef {
        let mut book = BookRef::new(self.book_id, self.title).with_authors(self.authors);
        if let Some(cover) = self.cover_id {
            book = book.with_cover(cover);
        }
        book
    }

    /// Builds the JSON body for `POST /api/favorites`.
    pub fn build_json(self) -> Value {
        json!({
            "book_id": self.book_id,
            "title": self.title,
            "cover_id": self.cover_id,
            "authors": self.authors,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_body_defaults() {
        let body = RegisterBodyBuilder::new("alice").build();
        assert_eq!(body["username"], "alice");
        assert_eq!(body["password"], TEST_PASSWORD);
        assert!(body.get("role").is_none());
    }

    #[test]
    fn test_register_body_with_role() {
        let body = RegisterBodyBuilder::new("root").role("ADMIN").build();
        assert_eq!(body["role"], "ADMIN");
    }

    #[test]
    fn test_user_builder_admin() {
        let user = UserBuilder::new("root").admin().build();
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn test_book_builder() {
        let book = BookBuilder::new("OL1W", "Title").cover("c1").authors("A").build();
        assert_eq!(book.cover_id.as_deref(), Some("c1"));
        assert_eq!(book.authors, "A");
    }
}

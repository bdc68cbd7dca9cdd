// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Pre-built test data for consistent and reproducible testing.
//!
//! ## Design Principles
//!
//! - Fixtures are immutable and thread-safe
//! - Each fixture represents a realistic scenario
//! - Fixtures can be composed for complex test scenarios

use shelf_config::{SecretValue, ShelfConfig};
use shelf_core::role::Role;
use shelf_core::types::{BookRef, ProfileFields};

/// JWT secret used by every test configuration. Long enough for HS256.
pub const TEST_JWT_SECRET: &str = "shelf-integration-test-secret-0123456789abcdef";

/// Default password used for fixture accounts.
pub const TEST_PASSWORD: &str = "correct horse battery staple";

// =============================================================================
// Config Fixtures
// =============================================================================

/// Fixture providing standard configurations.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// A valid baseline configuration with a test JWT secret.
    pub fn base() -> ShelfConfig {
        let mut config = ShelfConfig::default();
        config.security.jwt.secret = Some(SecretValue::new(TEST_JWT_SECRET));
        config.database.url = "sqlite::memory:".to_string();
        config
    }

    /// A configuration with a very short token lifetime.
    pub fn short_lived_tokens(expiration_secs: u64) -> ShelfConfig {
        let mut config = Self::base();
        config.security.jwt.expiration_secs = expiration_secs;
        config
    }

    /// A minimal YAML configuration document.
    pub fn yaml_minimal() -> String {
        format!(
            r#"
security:
  jwt:
    secret: "{}"
"#,
            TEST_JWT_SECRET
        )
    }

    /// A fuller YAML configuration document.
    pub fn yaml_full() -> String {
        format!(
            r#"
service:
  id: shelf-test
  name: Shelf Test

server:
  bind_address: "127.0.0.1"
  port: 9090
  request_timeout_secs: 15

database:
  url: "sqlite::memory:"
  max_connections: 2

security:
  jwt:
    secret: "{}"
    expiration_secs: 600
    issuer: shelf-test
  audit:
    enabled: false

bootstrap:
  run_on_startup: true
  admin:
    username: sudo
    password: "sudopass"
    country: Brazil

logging:
  level: debug
  format: json
"#,
            TEST_JWT_SECRET
        )
    }
}

// =============================================================================
// User Fixtures
// =============================================================================

/// Fixture providing canonical accounts.
pub struct UserFixtures;

impl UserFixtures {
    /// A regular user.
    pub fn alice() -> (&'static str, Role, ProfileFields) {
        (
            "alice",
            Role::User,
            ProfileFields {
                first_name: "Alice".to_string(),
                last_name: "Silva".to_string(),
                country: "Brazil".to_string(),
            },
        )
    }

    /// Another regular user.
    pub fn bob() -> (&'static str, Role, ProfileFields) {
        (
            "bob",
            Role::User,
            ProfileFields {
                first_name: "Bob".to_string(),
                last_name: "Souza".to_string(),
                country: "Portugal".to_string(),
            },
        )
    }

    /// The administrator account.
    pub fn sudo() -> (&'static str, Role, ProfileFields) {
        (
            "sudo",
            Role::Admin,
            ProfileFields {
                first_name: "Super".to_string(),
                last_name: "User".to_string(),
                country: "Brazil".to_string(),
            },
        )
    }
}

// =============================================================================
// Book Fixtures
// =============================================================================

/// Fixture providing canonical books.
pub struct BookFixtures;

impl BookFixtures {
    /// The Hobbit.
    pub fn hobbit() -> BookRef {
        BookRef::new("OL262758W", "The Hobbit")
            .with_cover("6090389")
            .with_authors("J.R.R. Tolkien")
    }

    /// Dom Casmurro.
    pub fn dom_casmurro() -> BookRef {
        BookRef::new("OL765708W", "Dom Casmurro").with_authors("Machado de Assis")
    }

    /// A book with no cover or authors.
    pub fn bare_book() -> BookRef {
        BookRef::new("OL000001W", "Untitled Draft")
    }

    /// A batch of distinct books.
    pub fn batch(count: usize) -> Vec<BookRef> {
        (0..count)
            .map(|i| BookRef::new(format!("OL{:06}W", i), format!("Book {}", i)))
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_config_is_valid() {
        ConfigFixtures::base().validate().unwrap();
    }

    #[test]
    fn test_fixture_books_are_distinct() {
        let batch = BookFixtures::batch(5);
        let mut ids: Vec<_> = batch.iter().map(|b| b.book_id.clone()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Configuration Integration Tests
//!
//! Integration tests for shelf-config functionality including:
//!
//! - Parsing from YAML, TOML, and JSON
//! - Validation rules
//! - Environment variable placeholders
//! - Secret handling
//!
//! ## Test Categories
//!
//! - `test_config_parse_*`: Format parsing tests
//! - `test_config_validate_*`: Validation tests
//! - `test_config_secret_*`: Secret handling tests

use shelf_config::{
    load_config_str, ConfigError, ConfigFormat, ConfigLoader, LogFormat, LogLevel,
    SecretValue, ShelfConfig,
};

use shelf_tests::common::fixtures::{ConfigFixtures, TEST_JWT_SECRET};
use shelf_tests::common::temp_test_dir;

// =============================================================================
// Parsing Tests
// =============================================================================

#[test]
fn test_config_parse_minimal_yaml() {
    let config = load_config_str(&ConfigFixtures::yaml_minimal(), ConfigFormat::Yaml).unwrap();

    // Everything not named falls back to defaults.
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.bind_address, "0.0.0.0");
    assert_eq!(config.security.jwt.issuer, "shelf");
    assert_eq!(config.security.jwt.secret.unwrap().raw(), TEST_JWT_SECRET);
}

#[test]
fn test_config_parse_full_yaml() {
    let config = load_config_str(&ConfigFixtures::yaml_full(), ConfigFormat::Yaml).unwrap();

    assert_eq!(config.service.id, "shelf-test");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.server.request_timeout_secs, 15);
    assert_eq!(config.database.url, "sqlite::memory:");
    assert_eq!(config.security.jwt.expiration_secs, 600);
    assert_eq!(config.security.jwt.issuer, "shelf-test");
    assert!(!config.security.audit.enabled);
    assert!(config.bootstrap.run_on_startup);
    assert_eq!(config.bootstrap.admin.username, "sudo");
    assert_eq!(config.bootstrap.admin.country, "Brazil");
    assert_eq!(config.logging.level, LogLevel::Debug);
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_config_parse_toml() {
    let content = format!(
        r#"
[server]
port = 3000

[security.jwt]
secret = "{TEST_JWT_SECRET}"
"#
    );

    let config = load_config_str(&content, ConfigFormat::Toml).unwrap();
    assert_eq!(config.server.port, 3000);
}

#[test]
fn test_config_parse_json() {
    let content = format!(
        r#"{{
  "server": {{ "port": 3001 }},
  "security": {{ "jwt": {{ "secret": "{TEST_JWT_SECRET}" }} }}
}}"#
    );

    let config = load_config_str(&content, ConfigFormat::Json).unwrap();
    assert_eq!(config.server.port, 3001);
}

#[test]
fn test_config_parse_rejects_unknown_fields() {
    let content = format!(
        r#"
server:
  port: 8080
  threads: 4
security:
  jwt:
    secret: "{TEST_JWT_SECRET}"
"#
    );

    assert!(load_config_str(&content, ConfigFormat::Yaml).is_err());
}

#[test]
fn test_config_format_from_extension() {
    use std::path::Path;

    assert_eq!(
        ConfigFormat::from_path(Path::new("shelf.yaml")).unwrap(),
        ConfigFormat::Yaml
    );
    assert_eq!(
        ConfigFormat::from_path(Path::new("shelf.yml")).unwrap(),
        ConfigFormat::Yaml
    );
    assert_eq!(
        ConfigFormat::from_path(Path::new("shelf.toml")).unwrap(),
        ConfigFormat::Toml
    );
    assert!(ConfigFormat::from_path(Path::new("shelf.ini")).is_err());
}

#[test]
fn test_config_load_from_file() {
    let dir = temp_test_dir("shelf-config-");
    let path = dir.path().join("shelf.yaml");
    std::fs::write(&path, ConfigFixtures::yaml_full()).unwrap();

    let config = shelf_config::load_config(&path).unwrap();
    assert_eq!(config.service.id, "shelf-test");
}

#[test]
fn test_config_load_missing_file() {
    let err = shelf_config::load_config("/nonexistent/shelf.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

// =============================================================================
// Environment Placeholder Tests
// =============================================================================

#[test]
fn test_config_env_placeholder_with_default() {
    let content = format!(
        r#"
server:
  bind_address: "${{SHELF_TEST_UNSET_BIND:127.0.0.1}}"
security:
  jwt:
    secret: "{TEST_JWT_SECRET}"
"#
    );

    let config = load_config_str(&content, ConfigFormat::Yaml).unwrap();
    assert_eq!(config.server.bind_address, "127.0.0.1");
}

#[test]
fn test_config_env_placeholder_resolves_variable() {
    std::env::set_var("SHELF_TEST_COUNTRY_VAR", "Uruguay");

    let content = format!(
        r#"
security:
  jwt:
    secret: "{TEST_JWT_SECRET}"
bootstrap:
  admin:
    country: "${{SHELF_TEST_COUNTRY_VAR}}"
"#
    );

    let config = load_config_str(&content, ConfigFormat::Yaml).unwrap();
    assert_eq!(config.bootstrap.admin.country, "Uruguay");
}

#[test]
fn test_config_env_placeholder_can_be_disabled() {
    let content = format!(
        r#"
security:
  jwt:
    secret: "{TEST_JWT_SECRET}"
bootstrap:
  admin:
    country: "${{SHELF_TEST_NEVER_SET}}"
"#
    );

    let loader = ConfigLoader::new().with_env_vars(false);
    let config = loader.load_from_str(&content, ConfigFormat::Yaml).unwrap();
    assert_eq!(config.bootstrap.admin.country, "${SHELF_TEST_NEVER_SET}");
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_config_validate_requires_jwt_secret() {
    let err = ShelfConfig::default().validate().unwrap_err();
    assert!(matches!(err, ConfigError::MissingField { ref field } if field == "security.jwt.secret"));
}

#[test]
fn test_config_validate_rejects_short_secret() {
    let mut config = ShelfConfig::default();
    config.security.jwt.secret = Some(SecretValue::new("too-short"));

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "security.jwt.secret"));
}

#[test]
fn test_config_validate_token_lifetime_bounds() {
    let mut config = ConfigFixtures::base();

    config.security.jwt.expiration_secs = 30;
    assert!(config.validate().is_err());

    config.security.jwt.expiration_secs = 7 * 86400;
    assert!(config.validate().is_err());

    config.security.jwt.expiration_secs = 3600;
    config.validate().unwrap();
}

#[test]
fn test_config_validate_base_fixture_passes() {
    ConfigFixtures::base().validate().unwrap();
}

#[test]
fn test_config_socket_addr() {
    let mut config = ConfigFixtures::base();
    config.server.bind_address = "127.0.0.1".to_string();
    config.server.port = 9191;

    let addr = config.server.socket_addr().unwrap();
    assert_eq!(addr.to_string(), "127.0.0.1:9191");

    config.server.bind_address = "not an address".to_string();
    assert!(config.server.socket_addr().is_err());
}

// =============================================================================
// Secret Handling Tests
// =============================================================================

#[test]
fn test_config_secret_debug_is_masked() {
    let secret = SecretValue::new("super-secret-value");
    let debug = format!("{:?}", secret);

    assert!(!debug.contains("super-secret-value"));
    assert!(debug.contains("***"));
}

#[test]
fn test_config_secret_raw_roundtrip() {
    let secret = SecretValue::new("raw-value");
    assert_eq!(secret.raw(), "raw-value");
    assert_eq!(secret.len(), 9);
    assert!(!secret.is_empty());
}

#[test]
fn test_config_secret_serializes_transparently() {
    // Transparent serde keeps the config file format flat; masking is a
    // Debug-only concern.
    let secret: SecretValue = serde_json::from_str("\"from-json\"").unwrap();
    assert_eq!(secret.raw(), "from-json");
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading and processing for Shelf.
//!
//! This module provides functionality to load, parse, validate, and process
//! configuration files in YAML, TOML, and JSON formats, with environment
//! variable overrides.
//!
//! # Loading Pipeline
//!
//! 1. Read the configuration file
//! 2. Resolve environment variable placeholders in the raw content
//! 3. Parse into [`ShelfConfig`] based on file extension
//! 4. Apply `SHELF_*` environment variable overrides
//! 5. Resolve relative paths against the config file's directory
//! 6. Validate the final configuration
//!
//! # Environment Variable Override
//!
//! Configuration values can be overridden using environment variables:
//!
//! ```text
//! SHELF_SERVER_PORT=9090
//! SHELF_DATABASE_URL=sqlite:///var/lib/shelf/shelf.db
//! SHELF_JWT_SECRET=...
//! SHELF_LOG_LEVEL=debug
//! ```

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{SecretValue, ShelfConfig};
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader for Shelf.
///
/// This loader supports loading configuration from files in YAML, TOML, and
/// JSON formats, with support for environment variable overrides.
///
/// # Examples
///
/// ```no_run
/// use shelf_config::loader::ConfigLoader;
///
/// let loader = ConfigLoader::new();
/// let config = loader.load("shelf.yaml").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Base directory for resolving relative paths.
    base_path: Option<PathBuf>,

    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to resolve environment variables in values.
    resolve_env_vars: bool,

    /// Whether to resolve relative paths.
    resolve_paths: bool,
}

impl ConfigLoader {
    /// Creates a new configuration loader with default settings.
    pub fn new() -> Self {
        Self {
            base_path: None,
            env_prefix: "SHELF".to_string(),
            resolve_env_vars: true,
            resolve_paths: true,
        }
    }

    /// Creates a builder for configuring the loader.
    pub fn builder() -> ConfigLoaderBuilder {
        ConfigLoaderBuilder::new()
    }

    /// Sets the base path for resolving relative paths.
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Enables or disables relative path resolution.
    pub fn with_path_resolution(mut self, enabled: bool) -> Self {
        self.resolve_paths = enabled;
        self
    }

    /// Loads configuration from a file.
    ///
    /// The file format is determined by the file extension:
    /// - `.yaml` or `.yml` - YAML format
    /// - `.toml` - TOML format
    /// - `.json` - JSON format
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Ok(ShelfConfig)` - Successfully loaded configuration
    /// * `Err(ConfigError)` - If loading or parsing fails
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<ShelfConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        // Determine base path
        let base_path = self.base_path.clone().unwrap_or_else(|| {
            path.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        });

        // Read file content
        let content = self.read_file(path)?;

        // Determine format and parse
        let format = ConfigFormat::from_path(path)?;
        let mut config: ShelfConfig = self.parse_content(&content, format, path)?;

        // Apply environment variable overrides
        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }

        // Resolve relative paths
        if self.resolve_paths {
            self.resolve_relative_paths(&mut config, &base_path);
        }

        // Validate configuration
        config.validate()?;

        info!("Configuration loaded successfully");
        debug!(
            "Service '{}' will bind {}:{}",
            config.service.id, config.server.bind_address, config.server.port
        );

        Ok(config)
    }

    /// Loads configuration from a string.
    ///
    /// # Arguments
    ///
    /// * `content` - Configuration content as string
    /// * `format` - The format of the content
    ///
    /// # Returns
    ///
    /// * `Ok(ShelfConfig)` - Successfully parsed configuration
    /// * `Err(ConfigError)` - If parsing fails
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<ShelfConfig> {
        let content = if self.resolve_env_vars {
            self.resolve_env_placeholders(content)?
        } else {
            content.to_string()
        };

        let mut config = self.parse_str(&content, format)?;

        // Apply environment variable overrides
        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }

        // Validate
        config.validate()?;

        Ok(config)
    }

    /// Reads file content.
    fn read_file(&self, path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
    }

    /// Parses content based on format.
    fn parse_content(
        &self,
        content: &str,
        format: ConfigFormat,
        path: &Path,
    ) -> ConfigResult<ShelfConfig> {
        // First resolve environment variables in the raw content
        let content = if self.resolve_env_vars {
            self.resolve_env_placeholders(content)?
        } else {
            content.to_string()
        };

        self.parse_str(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            other => other,
        })
    }

    /// Parses a string based on format.
    fn parse_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<ShelfConfig> {
        match format {
            ConfigFormat::Yaml => serde_yaml_parse(content),
            ConfigFormat::Toml => {
                toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
            }
            ConfigFormat::Json => {
                serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
            }
        }
    }

    /// Resolves environment variable placeholders in content.
    ///
    /// Supports the format: `${VAR_NAME}` or `${VAR_NAME:default}`
    fn resolve_env_placeholders(&self, content: &str) -> ConfigResult<String> {
        let mut result = String::with_capacity(content.len());
        let mut chars = content.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // consume '{'

                // Find the closing '}'
                let mut var_content = String::new();
                let mut found_close = false;

                for c in chars.by_ref() {
                    if c == '}' {
                        found_close = true;
                        break;
                    }
                    var_content.push(c);
                }

                if !found_close {
                    // No closing brace, keep as-is
                    result.push('$');
                    result.push('{');
                    result.push_str(&var_content);
                    continue;
                }

                // Parse variable name and default
                let (var_name, default_value) = if let Some(idx) = var_content.find(':') {
                    (&var_content[..idx], Some(&var_content[idx + 1..]))
                } else {
                    (var_content.as_str(), None)
                };

                // Look up environment variable
                match env::var(var_name) {
                    Ok(value) => result.push_str(&value),
                    Err(_) => {
                        if let Some(default) = default_value {
                            result.push_str(default);
                        } else {
                            // Keep the original placeholder if not found and no default
                            warn!("Environment variable '{}' not found", var_name);
                            result.push_str(&format!("${{{}}}", var_name));
                        }
                    }
                }
            } else {
                result.push(c);
            }
        }

        Ok(result)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&self, config: &mut ShelfConfig) -> ConfigResult<()> {
        // Service overrides
        if let Ok(value) = env::var(format!("{}_SERVICE_ID", self.env_prefix)) {
            config.service.id = value;
        }

        // Server overrides
        if let Ok(value) = env::var(format!("{}_SERVER_PORT", self.env_prefix)) {
            config.server.port = value.parse().map_err(|_| {
                ConfigError::invalid_env_var(
                    format!("{}_SERVER_PORT", self.env_prefix),
                    "expected valid port number",
                )
            })?;
        }
        if let Ok(value) = env::var(format!("{}_BIND_ADDRESS", self.env_prefix)) {
            config.server.bind_address = value;
        }

        // Database overrides
        if let Ok(value) = env::var(format!("{}_DATABASE_URL", self.env_prefix)) {
            config.database.url = value;
        }

        // Security overrides. The JWT secret is the recommended value to
        // inject via environment rather than the config file.
        if let Ok(value) = env::var(format!("{}_JWT_SECRET", self.env_prefix)) {
            config.security.jwt.secret = Some(SecretValue::new(value));
        }
        if let Ok(value) = env::var(format!("{}_JWT_EXPIRATION_SECS", self.env_prefix)) {
            config.security.jwt.expiration_secs = value.parse().map_err(|_| {
                ConfigError::invalid_env_var(
                    format!("{}_JWT_EXPIRATION_SECS", self.env_prefix),
                    "expected valid number of seconds",
                )
            })?;
        }
        if let Ok(value) = env::var(format!("{}_AUDIT_ENABLED", self.env_prefix)) {
            config.security.audit.enabled = parse_bool(&value);
        }

        // Bootstrap overrides
        if let Ok(value) = env::var(format!("{}_BOOTSTRAP_ADMIN_PASSWORD", self.env_prefix)) {
            config.bootstrap.admin.password = Some(SecretValue::new(value));
        }

        // Logging overrides
        if let Ok(value) = env::var(format!("{}_LOG_LEVEL", self.env_prefix)) {
            if let Some(level) = parse_log_level(&value) {
                config.logging.level = level;
            }
        }

        Ok(())
    }

    /// Resolves relative paths in configuration.
    ///
    /// The database URL is left untouched: sqlite URLs are interpreted by
    /// the pool relative to the working directory, and rewriting them would
    /// require URL surgery.
    fn resolve_relative_paths(&self, config: &mut ShelfConfig, base_path: &Path) {
        // Resolve audit log path
        if config.security.audit.path.is_relative() {
            config.security.audit.path = base_path.join(&config.security.audit.path);
        }

        // Resolve logging file path
        if let Some(ref mut log_file) = config.logging.file {
            if log_file.is_relative() {
                *log_file = base_path.join(&log_file);
            }
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigLoaderBuilder
// =============================================================================

/// Builder for ConfigLoader.
#[derive(Debug, Default)]
pub struct ConfigLoaderBuilder {
    base_path: Option<PathBuf>,
    env_prefix: Option<String>,
    resolve_env_vars: Option<bool>,
    resolve_paths: Option<bool>,
}

impl ConfigLoaderBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base path.
    pub fn base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Sets the environment prefix.
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn resolve_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = Some(enabled);
        self
    }

    /// Enables or disables path resolution.
    pub fn resolve_paths(mut self, enabled: bool) -> Self {
        self.resolve_paths = Some(enabled);
        self
    }

    /// Builds the ConfigLoader.
    pub fn build(self) -> ConfigLoader {
        let mut loader = ConfigLoader::new();

        if let Some(base_path) = self.base_path {
            loader.base_path = Some(base_path);
        }
        if let Some(prefix) = self.env_prefix {
            loader.env_prefix = prefix;
        }
        if let Some(resolve_env_vars) = self.resolve_env_vars {
            loader.resolve_env_vars = resolve_env_vars;
        }
        if let Some(resolve_paths) = self.resolve_paths {
            loader.resolve_paths = resolve_paths;
        }

        loader
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parses a string to bool.
fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "true" | "1" | "yes" | "on" | "enabled"
    )
}

/// Parses a log level string.
fn parse_log_level(value: &str) -> Option<crate::schema::LogLevel> {
    match value.to_lowercase().as_str() {
        "trace" => Some(crate::schema::LogLevel::Trace),
        "debug" => Some(crate::schema::LogLevel::Debug),
        "info" => Some(crate::schema::LogLevel::Info),
        "warn" | "warning" => Some(crate::schema::LogLevel::Warn),
        "error" => Some(crate::schema::LogLevel::Error),
        _ => None,
    }
}

/// YAML parsing with the config crate.
fn serde_yaml_parse<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .map_err(|e| ConfigError::serialization(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ConfigError::serialization(e.to_string()))
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
///
/// This is a convenience function for simple use cases.
///
/// # Examples
///
/// ```no_run
/// use shelf_config::loader::load_config;
///
/// let config = load_config("shelf.yaml").unwrap();
/// ```
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<ShelfConfig> {
    ConfigLoader::new().load(path)
}

/// Loads configuration from a string with the specified format.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<ShelfConfig> {
    ConfigLoader::new().load_from_str(content, format)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_yaml() -> String {
        r#"
service:
  id: test-shelf
  name: Test Shelf

server:
  bind_address: 127.0.0.1
  port: 8080

database:
  url: "sqlite::memory:"

security:
  jwt:
    secret: "0123456789abcdef0123456789abcdef"
    expiration_secs: 3600

logging:
  level: info
"#
        .to_string()
    }

    #[test]
    fn test_load_yaml() {
        let yaml = create_test_yaml();
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let loader = ConfigLoader::new();
        let config = loader.load(file.path()).unwrap();

        assert_eq!(config.service.id, "test-shelf");
        assert_eq!(config.service.name, "Test Shelf");
        assert_eq!(config.server.bind_address, "127.0.0.1");
        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[test]
    fn test_load_rejects_missing_secret() {
        let yaml = r#"
service:
  id: test-shelf
"#;
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        // Unique prefix so an ambient SHELF_JWT_SECRET cannot leak in
        let loader = ConfigLoader::new().with_env_prefix("SHELF_NOSECRET_TEST");
        let result = loader.load(file.path());
        assert!(matches!(result, Err(ConfigError::MissingField { .. })));
    }

    #[test]
    fn test_config_format_from_path() {
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
        assert_eq!(
            ConfigFormat::from_path(Path::new("shelf.json")).unwrap(),
            ConfigFormat::Json
        );
        assert!(ConfigFormat::from_path(Path::new("shelf.txt")).is_err());
    }

    #[test]
    fn test_env_placeholder_resolution() {
        let loader = ConfigLoader::new();

        // Test with a variable that likely exists (PATH)
        let result = loader.resolve_env_placeholders("value: ${PATH}").unwrap();
        assert!(result.starts_with("value: "));
        assert!(!result.contains("${PATH}") || result.len() > "value: ".len());
    }

    #[test]
    fn test_env_placeholder_with_default() {
        let loader = ConfigLoader::new();
        let result = loader
            .resolve_env_placeholders("value: ${NONEXISTENT_VAR:default}")
            .unwrap();
        assert_eq!(result, "value: default");
    }

    #[test]
    fn test_env_placeholder_unclosed() {
        let loader = ConfigLoader::new();
        let result = loader.resolve_env_placeholders("value: ${UNCLOSED").unwrap();
        assert_eq!(result, "value: ${UNCLOSED");
    }

    #[test]
    fn test_env_override_applies() {
        // Unique prefix keeps this test isolated from parallel tests
        env::set_var("SHELF_OVERRIDE_TEST_SERVER_PORT", "9191");

        let yaml = create_test_yaml();
        let loader = ConfigLoader::new().with_env_prefix("SHELF_OVERRIDE_TEST");
        let config = loader.load_from_str(&yaml, ConfigFormat::Yaml).unwrap();

        assert_eq!(config.server.port, 9191);
        env::remove_var("SHELF_OVERRIDE_TEST_SERVER_PORT");
    }

    #[test]
    fn test_env_override_invalid_port() {
        env::set_var("SHELF_BADPORT_TEST_SERVER_PORT", "not-a-port");

        let yaml = create_test_yaml();
        let loader = ConfigLoader::new().with_env_prefix("SHELF_BADPORT_TEST");
        let result = loader.load_from_str(&yaml, ConfigFormat::Yaml);

        assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
        env::remove_var("SHELF_BADPORT_TEST_SERVER_PORT");
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("1"));
        assert!(parse_bool("yes"));
        assert!(parse_bool("on"));
        assert!(parse_bool("enabled"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("no"));
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(
            parse_log_level("trace"),
            Some(crate::schema::LogLevel::Trace)
        );
        assert_eq!(
            parse_log_level("debug"),
            Some(crate::schema::LogLevel::Debug)
        );
        assert_eq!(parse_log_level("info"), Some(crate::schema::LogLevel::Info));
        assert_eq!(parse_log_level("warn"), Some(crate::schema::LogLevel::Warn));
        assert_eq!(
            parse_log_level("error"),
            Some(crate::schema::LogLevel::Error)
        );
        assert_eq!(parse_log_level("invalid"), None);
    }

    #[test]
    fn test_loader_builder() {
        let loader = ConfigLoader::builder()
            .env_prefix("MYAPP")
            .resolve_env_vars(false)
            .resolve_paths(true)
            .build();

        assert_eq!(loader.env_prefix, "MYAPP");
        assert!(!loader.resolve_env_vars);
        assert!(loader.resolve_paths);
    }

    #[test]
    fn test_load_from_str() {
        let yaml = create_test_yaml();
        let loader = ConfigLoader::new().with_env_vars(false);
        let config = loader.load_from_str(&yaml, ConfigFormat::Yaml).unwrap();

        assert_eq!(config.service.id, "test-shelf");
    }

    #[test]
    fn test_load_toml() {
        let toml = r#"
[service]
id = "toml-shelf"

[database]
url = "sqlite::memory:"

[security.jwt]
secret = "0123456789abcdef0123456789abcdef"
"#;
        let loader = ConfigLoader::new().with_env_vars(false);
        let config = loader.load_from_str(toml, ConfigFormat::Toml).unwrap();

        assert_eq!(config.service.id, "toml-shelf");
    }

    #[test]
    fn test_file_not_found() {
        let loader = ConfigLoader::new();
        let result = loader.load("/nonexistent/path/shelf.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_relative_audit_path_resolved() {
        let yaml = create_test_yaml();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelf.yaml");
        std::fs::write(&path, yaml).unwrap();

        let loader = ConfigLoader::new();
        let config = loader.load(&path).unwrap();

        // Default audit path is relative; it should now live under the temp dir
        assert!(config.security.audit.path.starts_with(dir.path()));
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Core audit log types.

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

// =============================================================================
// Audit Log Entry
// =============================================================================

/// A single audit log entry.
///
/// Each entry captures who did what to which account or favorite, and how it
/// turned out. Entries never contain credential material; passwords and
/// hashes are excluded at the type level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    /// Unique log entry ID.
    pub id: Uuid,

    /// When the event occurred.
    pub timestamp: DateTime<Utc>,

    /// Severity level of the event.
    pub severity: AuditSeverity,

    /// Account that performed the action (if authenticated).
    pub username: Option<String>,

    /// Client IP address.
    pub client_ip: Option<IpAddr>,

    /// The action that was performed.
    pub action: AuditAction,

    /// The resource that was affected.
    pub resource: AuditResource,

    /// Additional details about the action.
    pub details: serde_json::Value,

    /// The result of the action.
    pub result: ActionResult,

    /// Duration of the operation in milliseconds.
    pub duration_ms: Option<u64>,

    /// Correlation ID for request tracing.
    pub correlation_id: Option<Uuid>,

    /// User agent string (for API requests).
    pub user_agent: Option<String>,
}

impl AuditLog {
    /// Creates a new audit log entry.
    pub fn new(action: AuditAction, resource: AuditResource, result: ActionResult) -> Self {
        Self {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            severity: action.default_severity(),
            username: None,
            client_ip: None,
            action,
            resource,
            details: serde_json::Value::Null,
            result,
            duration_ms: None,
            correlation_id: None,
            user_agent: None,
        }
    }

    /// Creates a builder for constructing audit logs.
    pub fn builder(action: AuditAction, resource: AuditResource) -> AuditLogBuilder {
        AuditLogBuilder::new(action, resource)
    }

    /// Sets the acting account.
    pub fn with_actor(mut self, username: impl Into<String>, client_ip: Option<IpAddr>) -> Self {
        self.username = Some(username.into());
        self.client_ip = client_ip;
        self
    }

    /// Sets the details.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// Sets the duration.
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Sets the correlation ID.
    pub fn with_correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = Some(id);
        self
    }

    /// Sets the severity.
    pub fn with_severity(mut self, severity: AuditSeverity) -> Self {
        self.severity = severity;
        self
    }

    // =========================================================================
    // Factory methods for common actions
    // =========================================================================

    /// Creates an audit log for a registration.
    pub fn register(username: impl Into<String>, client_ip: Option<IpAddr>) -> Self {
        let username = username.into();
        Self::new(
            AuditAction::Register,
            AuditResource::user(&username),
            ActionResult::Success,
        )
        .with_actor(&username, client_ip)
    }

    /// Creates an audit log for a login attempt.
    pub fn login(username: impl Into<String>, client_ip: Option<IpAddr>, success: bool) -> Self {
        let username = username.into();
        let result = if success {
            ActionResult::Success
        } else {
            ActionResult::Failure {
                reason: "invalid credentials".to_string(),
            }
        };

        Self::new(AuditAction::Login, AuditResource::user(&username), result)
            .with_actor(&username, client_ip)
            .with_severity(if success {
                AuditSeverity::Info
            } else {
                AuditSeverity::Warning
            })
    }

    /// Creates an audit log for a rejected token.
    ///
    /// The rejection reason goes into the log only; clients see a uniform
    /// response.
    pub fn token_rejected(reason: impl Into<String>, client_ip: Option<IpAddr>) -> Self {
        Self::new(
            AuditAction::TokenReject,
            AuditResource::api("bearer"),
            ActionResult::rejected(reason),
        )
        .with_severity(AuditSeverity::Warning)
        .with_actor("anonymous", client_ip)
    }

    /// Creates an audit log for access denied.
    pub fn access_denied(
        resource: AuditResource,
        username: impl Into<String>,
        client_ip: Option<IpAddr>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(AuditAction::AccessDenied, resource, ActionResult::Denied)
            .with_actor(username, client_ip)
            .with_details(serde_json::json!({
                "reason": reason.into(),
            }))
            .with_severity(AuditSeverity::Warning)
    }

    /// Creates an audit log for a profile update.
    pub fn user_updated(
        username: impl Into<String>,
        actor: impl Into<String>,
        client_ip: Option<IpAddr>,
    ) -> Self {
        Self::new(
            AuditAction::UserUpdate,
            AuditResource::user(username),
            ActionResult::Success,
        )
        .with_actor(actor, client_ip)
    }

    /// Creates an audit log for an account deletion.
    pub fn user_deleted(
        username: impl Into<String>,
        actor: impl Into<String>,
        client_ip: Option<IpAddr>,
    ) -> Self {
        Self::new(
            AuditAction::UserDelete,
            AuditResource::user(username),
            ActionResult::Success,
        )
        .with_actor(actor, client_ip)
    }

    /// Creates an audit log for a role change.
    pub fn role_changed(
        username: impl Into<String>,
        old_role: Role,
        new_role: Role,
        actor: impl Into<String>,
        client_ip: Option<IpAddr>,
    ) -> Self {
        Self::new(
            AuditAction::RoleChange,
            AuditResource::user(username),
            ActionResult::Success,
        )
        .with_actor(actor, client_ip)
        .with_details(serde_json::json!({
            "old_role": old_role.as_str(),
            "new_role": new_role.as_str(),
        }))
    }

    /// Creates an audit log for a favorite being added.
    pub fn favorite_added(
        username: impl Into<String>,
        book_id: impl Into<String>,
        client_ip: Option<IpAddr>,
    ) -> Self {
        let username = username.into();
        Self::new(
            AuditAction::FavoriteAdd,
            AuditResource::favorite(&username, book_id),
            ActionResult::Success,
        )
        .with_actor(username, client_ip)
    }

    /// Creates an audit log for a favorite being removed.
    pub fn favorite_removed(
        username: impl Into<String>,
        book_id: impl Into<String>,
        client_ip: Option<IpAddr>,
    ) -> Self {
        let username = username.into();
        Self::new(
            AuditAction::FavoriteRemove,
            AuditResource::favorite(&username, book_id),
            ActionResult::Success,
        )
        .with_actor(username, client_ip)
    }

    /// Creates an audit log for system start.
    pub fn system_start(version: impl Into<String>) -> Self {
        Self::new(
            AuditAction::SystemStart,
            AuditResource::system(),
            ActionResult::Success,
        )
        .with_details(serde_json::json!({
            "version": version.into(),
        }))
    }

    /// Creates an audit log for system shutdown.
    pub fn system_shutdown(reason: Option<String>) -> Self {
        let details = match reason {
            Some(r) => serde_json::json!({ "reason": r }),
            None => serde_json::Value::Null,
        };

        Self::new(
            AuditAction::SystemShutdown,
            AuditResource::system(),
            ActionResult::Success,
        )
        .with_details(details)
    }

    /// Creates an audit log for a bootstrap run.
    pub fn bootstrap(details: serde_json::Value) -> Self {
        Self::new(
            AuditAction::Bootstrap,
            AuditResource::system(),
            ActionResult::Success,
        )
        .with_details(details)
    }
}

// =============================================================================
// Audit Log Builder
// =============================================================================

/// Builder for constructing audit log entries.
#[derive(Debug)]
pub struct AuditLogBuilder {
    action: AuditAction,
    resource: AuditResource,
    result: ActionResult,
    severity: Option<AuditSeverity>,
    username: Option<String>,
    client_ip: Option<IpAddr>,
    details: Option<serde_json::Value>,
    duration_ms: Option<u64>,
    correlation_id: Option<Uuid>,
    user_agent: Option<String>,
}

impl AuditLogBuilder {
    /// Creates a new builder.
    pub fn new(action: AuditAction, resource: AuditResource) -> Self {
        Self {
            action,
            resource,
            result: ActionResult::Success,
            severity: None,
            username: None,
            client_ip: None,
            details: None,
            duration_ms: None,
            correlation_id: None,
            user_agent: None,
        }
    }

    /// Sets the result.
    pub fn result(mut self, result: ActionResult) -> Self {
        self.result = result;
        self
    }

    /// Sets the severity.
    pub fn severity(mut self, severity: AuditSeverity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Sets the acting account.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the client IP.
    pub fn client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// Sets the details.
    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Sets the duration.
    pub fn duration_ms(mut self, duration: u64) -> Self {
        self.duration_ms = Some(duration);
        self
    }

    /// Sets the correlation ID.
    pub fn correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = Some(id);
        self
    }

    /// Sets the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the audit log.
    pub fn build(self) -> AuditLog {
        let mut log = AuditLog::new(self.action, self.resource, self.result);

        if let Some(severity) = self.severity {
            log.severity = severity;
        }
        log.username = self.username;
        log.client_ip = self.client_ip;
        if let Some(details) = self.details {
            log.details = details;
        }
        log.duration_ms = self.duration_ms;
        log.correlation_id = self.correlation_id;
        log.user_agent = self.user_agent;

        log
    }
}

// =============================================================================
// Audit Severity
// =============================================================================

/// Severity level for audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuditSeverity {
    /// Debug level - detailed information for debugging.
    Debug,

    /// Info level - normal operations.
    #[default]
    Info,

    /// Notice level - normal but significant events.
    Notice,

    /// Warning level - potentially harmful situations.
    Warning,

    /// Error level - error events.
    Error,

    /// Critical level - critical conditions.
    Critical,
}

impl AuditSeverity {
    /// Returns the severity level as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditSeverity::Debug => "debug",
            AuditSeverity::Info => "info",
            AuditSeverity::Notice => "notice",
            AuditSeverity::Warning => "warning",
            AuditSeverity::Error => "error",
            AuditSeverity::Critical => "critical",
        }
    }

    /// Returns the numeric level (higher = more severe).
    pub fn level(&self) -> u8 {
        match self {
            AuditSeverity::Debug => 0,
            AuditSeverity::Info => 1,
            AuditSeverity::Notice => 2,
            AuditSeverity::Warning => 3,
            AuditSeverity::Error => 4,
            AuditSeverity::Critical => 5,
        }
    }
}

impl std::fmt::Display for AuditSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Audit Action
// =============================================================================

/// Types of auditable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    // =========================================================================
    // Authentication
    // =========================================================================
    /// Account registered.
    Register,
    /// Login attempt.
    Login,
    /// Token issued.
    TokenIssue,
    /// Token rejected (expired, tampered, or malformed).
    TokenReject,
    /// Authorization denied for an authenticated account.
    AccessDenied,

    // =========================================================================
    // Accounts
    // =========================================================================
    /// Account profile read.
    UserRead,
    /// Account list read.
    UserList,
    /// Account profile updated.
    UserUpdate,
    /// Account deleted.
    UserDelete,
    /// Password changed.
    PasswordChange,
    /// Role changed.
    RoleChange,

    // =========================================================================
    // Favorites
    // =========================================================================
    /// Favorite added.
    FavoriteAdd,
    /// Favorite removed.
    FavoriteRemove,

    // =========================================================================
    // System
    // =========================================================================
    /// System started.
    SystemStart,
    /// System shutdown.
    SystemShutdown,
    /// Bootstrap seeding ran.
    Bootstrap,
    /// Health check performed.
    HealthCheck,
    /// Security event.
    SecurityEvent,
}

impl AuditAction {
    /// Returns the action name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Register => "register",
            AuditAction::Login => "login",
            AuditAction::TokenIssue => "token_issue",
            AuditAction::TokenReject => "token_reject",
            AuditAction::AccessDenied => "access_denied",
            AuditAction::UserRead => "user_read",
            AuditAction::UserList => "user_list",
            AuditAction::UserUpdate => "user_update",
            AuditAction::UserDelete => "user_delete",
            AuditAction::PasswordChange => "password_change",
            AuditAction::RoleChange => "role_change",
            AuditAction::FavoriteAdd => "favorite_add",
            AuditAction::FavoriteRemove => "favorite_remove",
            AuditAction::SystemStart => "system_start",
            AuditAction::SystemShutdown => "system_shutdown",
            AuditAction::Bootstrap => "bootstrap",
            AuditAction::HealthCheck => "health_check",
            AuditAction::SecurityEvent => "security_event",
        }
    }

    /// Returns `true` if this is a security-sensitive action.
    pub fn is_security_sensitive(&self) -> bool {
        matches!(
            self,
            AuditAction::Register
                | AuditAction::Login
                | AuditAction::TokenIssue
                | AuditAction::TokenReject
                | AuditAction::AccessDenied
                | AuditAction::UserDelete
                | AuditAction::PasswordChange
                | AuditAction::RoleChange
                | AuditAction::SecurityEvent
        )
    }

    /// Returns `true` if this action mutates stored state.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            AuditAction::Register
                | AuditAction::UserUpdate
                | AuditAction::UserDelete
                | AuditAction::PasswordChange
                | AuditAction::RoleChange
                | AuditAction::FavoriteAdd
                | AuditAction::FavoriteRemove
                | AuditAction::Bootstrap
        )
    }

    /// Returns the default severity for this action.
    pub fn default_severity(&self) -> AuditSeverity {
        match self {
            AuditAction::TokenReject | AuditAction::AccessDenied | AuditAction::SecurityEvent => {
                AuditSeverity::Warning
            }
            AuditAction::Register
            | AuditAction::UserUpdate
            | AuditAction::UserDelete
            | AuditAction::PasswordChange
            | AuditAction::RoleChange
            | AuditAction::Bootstrap
            | AuditAction::SystemStart
            | AuditAction::SystemShutdown => AuditSeverity::Notice,
            _ => AuditSeverity::Info,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Audit Resource
// =============================================================================

/// The resource that was affected by an action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResource {
    /// Resource type.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
}

impl AuditResource {
    /// Creates a new audit resource.
    pub fn new(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
        }
    }

    /// Creates an account resource.
    pub fn user(username: impl Into<String>) -> Self {
        Self::new("user", username)
    }

    /// Creates a role resource.
    pub fn role(name: impl Into<String>) -> Self {
        Self::new("role", name)
    }

    /// Creates a favorite resource.
    pub fn favorite(username: impl Into<String>, book_id: impl Into<String>) -> Self {
        Self::new(
            "favorite",
            format!("{}:{}", username.into(), book_id.into()),
        )
    }

    /// Creates a system resource.
    pub fn system() -> Self {
        Self::new("system", "shelf")
    }

    /// Creates an API resource.
    pub fn api(endpoint: impl Into<String>) -> Self {
        Self::new("api", endpoint)
    }

    /// Returns the full resource path.
    pub fn full_path(&self) -> String {
        format!("{}:{}", self.resource_type, self.resource_id)
    }
}

// =============================================================================
// Action Result
// =============================================================================

/// The result of an audited action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ActionResult {
    /// Action completed successfully.
    #[serde(rename = "success")]
    Success,

    /// Action failed.
    #[serde(rename = "failure")]
    Failure {
        /// Reason for failure.
        reason: String,
    },

    /// Action was denied (authorization).
    #[serde(rename = "denied")]
    Denied,

    /// Action was rejected before it ran (e.g. malformed token).
    #[serde(rename = "rejected")]
    Rejected {
        /// Reason for rejection.
        reason: String,
    },
}

impl ActionResult {
    /// Creates a failure result.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    /// Creates a rejected result.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the action was successful.
    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success)
    }

    /// Returns `true` if the action was denied.
    pub fn is_denied(&self) -> bool {
        matches!(self, ActionResult::Denied)
    }

    /// Returns `true` if the action failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, ActionResult::Failure { .. })
    }

    /// Returns the status as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionResult::Success => "success",
            ActionResult::Failure { .. } => "failure",
            ActionResult::Denied => "denied",
            ActionResult::Rejected { .. } => "rejected",
        }
    }
}

impl Default for ActionResult {
    fn default() -> Self {
        Self::Success
    }
}

// =============================================================================
// Audit Filter
// =============================================================================

/// Filter for querying audit logs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditFilter {
    /// Filter by acting account.
    pub username: Option<String>,
    /// Filter by action type.
    pub action: Option<AuditAction>,
    /// Filter by resource type.
    pub resource_type: Option<String>,
    /// Filter by resource ID.
    pub resource_id: Option<String>,
    /// Filter by result.
    pub success_only: Option<bool>,
    /// Filter by minimum severity.
    pub min_severity: Option<AuditSeverity>,
    /// Start time (inclusive).
    pub from: Option<DateTime<Utc>>,
    /// End time (exclusive).
    pub to: Option<DateTime<Utc>>,
    /// Filter by correlation ID.
    pub correlation_id: Option<Uuid>,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Offset for pagination.
    pub offset: Option<usize>,
    /// Sort order (true = descending by timestamp).
    #[serde(default)]
    pub descending: bool,
}

impl AuditFilter {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by acting account.
    pub fn user(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Filters by action.
    pub fn action(mut self, action: AuditAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Filters by resource type.
    pub fn resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    /// Filters by time range.
    pub fn time_range(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    /// Filters by minimum severity.
    pub fn min_severity(mut self, severity: AuditSeverity) -> Self {
        self.min_severity = Some(severity);
        self
    }

    /// Sets the limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the offset.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets descending order.
    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    /// Checks if a log entry matches this filter.
    pub fn matches(&self, log: &AuditLog) -> bool {
        if let Some(ref username) = self.username {
            if log.username.as_ref() != Some(username) {
                return false;
            }
        }

        if let Some(action) = self.action {
            if log.action != action {
                return false;
            }
        }

        if let Some(ref resource_type) = self.resource_type {
            if &log.resource.resource_type != resource_type {
                return false;
            }
        }

        if let Some(ref resource_id) = self.resource_id {
            if &log.resource.resource_id != resource_id {
                return false;
            }
        }

        if let Some(success_only) = self.success_only {
            if success_only && !log.result.is_success() {
                return false;
            }
        }

        if let Some(min_severity) = self.min_severity {
            if log.severity.level() < min_severity.level() {
                return false;
            }
        }

        if let Some(from) = self.from {
            if log.timestamp < from {
                return false;
            }
        }

        if let Some(to) = self.to {
            if log.timestamp >= to {
                return false;
            }
        }

        if let Some(correlation_id) = self.correlation_id {
            if log.correlation_id != Some(correlation_id) {
                return false;
            }
        }

        true
    }
}

// =============================================================================
// Sensitive Value
// =============================================================================

/// A wrapper for sensitive values that must be masked in logs.
///
/// Request types carry passwords as `SensitiveValue<String>` so a derived
/// `Debug` on the surrounding struct can never print the plaintext.
#[derive(Clone)]
pub struct SensitiveValue<T> {
    inner: T,
    mask: String,
}

impl<T> SensitiveValue<T> {
    /// Creates a new sensitive value with the default mask.
    pub fn new(value: T) -> Self {
        Self {
            inner: value,
            mask: "[REDACTED]".to_string(),
        }
    }

    /// Creates a new sensitive value with a custom mask.
    pub fn with_mask(value: T, mask: impl Into<String>) -> Self {
        Self {
            inner: value,
            mask: mask.into(),
        }
    }

    /// Gets the inner value.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Consumes the wrapper and returns the inner value.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> std::fmt::Debug for SensitiveValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mask)
    }
}

impl<T> std::fmt::Display for SensitiveValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mask)
    }
}

impl<T: Serialize> Serialize for SensitiveValue<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.mask)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for SensitiveValue<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Self::new)
    }
}

// =============================================================================
// Tests
// =============================================================================

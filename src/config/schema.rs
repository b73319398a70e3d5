//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from the JSON config file.
//! Only `server` is required; every other section falls back to its default.

use serde::{Deserialize, Serialize};

/// Root configuration for the masking proxy.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ProxyConfig {
    /// Base URL of the single backend (e.g., "http://127.0.0.1:8081").
    pub server: String,

    /// Deny rules evaluated against GET requests.
    #[serde(default)]
    pub deny: DenyRules,

    /// Listener configuration (bind address).
    #[serde(default)]
    pub listener: ListenerConfig,

    /// Query value masking settings.
    #[serde(default)]
    pub masking: MaskingConfig,

    /// Timeout configuration.
    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// Log dump limits.
    #[serde(default)]
    pub limits: LimitConfig,

    /// Observability settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl ProxyConfig {
    /// Create a configuration for `server` with every other section defaulted.
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            deny: DenyRules::default(),
            listener: ListenerConfig::default(),
            masking: MaskingConfig::default(),
            timeouts: TimeoutConfig::default(),
            limits: LimitConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }

    /// The part of the configuration that can be swapped while serving.
    pub fn policy(&self) -> PolicySnapshot {
        PolicySnapshot {
            deny: self.deny.clone(),
            masking: self.masking.clone(),
        }
    }
}

/// Header and query parameter names whose presence blocks a GET request.
///
/// Order has no effect on matching; it is kept so iteration is deterministic.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct DenyRules {
    /// Header names (case-insensitive, per HTTP).
    pub headers: Vec<String>,

    /// Query parameter names (case-sensitive).
    #[serde(rename = "url-params")]
    pub url_params: Vec<String>,
}

impl DenyRules {
    /// True when no rule is configured.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.url_params.is_empty()
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:9090").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Which requests get their query values masked.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MaskingScope {
    /// Mask every request that was not blocked, whatever its method.
    #[default]
    AllMethods,
    /// Mask only the requests the deny rules apply to (GET).
    DenyScope,
}

/// Query value masking configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct MaskingConfig {
    /// Method scope of masking.
    pub scope: MaskingScope,

    /// Region assumed for phone numbers written without a country code.
    pub default_region: String,
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            scope: MaskingScope::AllMethods,
            default_region: "US".to_string(),
        }
    }
}

/// Timeout configuration applied by the HTTP layer.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Limits on what the request/response dumps carry.
///
/// Bodies are always forwarded in full; only the logged copy is cut.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LimitConfig {
    /// Body bytes kept in a log dump before the rest is elided.
    pub max_logged_body_bytes: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_logged_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Immutable view of the request policy shared by all in-flight requests.
///
/// A reload replaces the whole snapshot; fields are never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicySnapshot {
    pub deny: DenyRules,
    pub masking: MaskingConfig,
}

//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Backend URL must parse and use plain http (no TLS to the backend)
//! - Deny header names must be valid HTTP header names
//! - Validate value ranges (timeouts > 0, bind address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;
use crate::observability::logging::LOG_LEVELS;
use crate::pii::detector::region_from_code;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("server URL {url:?} is invalid: {reason}")]
    InvalidServer { url: String, reason: String },

    #[error("server URL {0:?} must use http")]
    UnsupportedScheme(String),

    #[error("deny header {0:?} is not a valid header name")]
    InvalidHeaderName(String),

    #[error("bind address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("unknown phone region {0:?}")]
    UnknownRegion(String),

    #[error("unknown log level {0:?}")]
    UnknownLogLevel(String),
}

/// Parse and check the backend base URL.
pub fn parse_server_url(server: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(server).map_err(|e| ValidationError::InvalidServer {
        url: server.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" => {}
        _ => return Err(ValidationError::UnsupportedScheme(server.to_string())),
    }

    if url.host_str().is_none() {
        return Err(ValidationError::InvalidServer {
            url: server.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(url)
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = parse_server_url(&config.server) {
        errors.push(e);
    }

    for name in &config.deny.headers {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeaderName(name.clone()));
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if region_from_code(&config.masking.default_region).is_none() {
        errors.push(ValidationError::UnknownRegion(
            config.masking.default_region.clone(),
        ));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

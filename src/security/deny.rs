//! Deny rule evaluation.
//!
//! # Responsibilities
//! - Decide whether a request must be rejected before it leaves the proxy
//!
//! # Design Decisions
//! - Only GET requests are subject to deny rules; every other method passes
//! - Header rules match when the header carries a non-empty value
//! - Query parameter rules match on presence, whatever the value
//! - Pure decision: no logging, no side effects

use axum::http::{Method, Request};
use url::form_urlencoded;

use crate::config::DenyRules;

/// True if `request` matches any configured deny rule.
pub fn should_block_request<B>(request: &Request<B>, rules: &DenyRules) -> bool {
    if request.method() != Method::GET {
        return false;
    }

    let headers = request.headers();
    for name in &rules.headers {
        let present = headers
            .get_all(name.as_str())
            .iter()
            .any(|value| !value.is_empty());
        if present {
            return true;
        }
    }

    if rules.url_params.is_empty() {
        return false;
    }

    let query = request.uri().query().unwrap_or("");
    form_urlencoded::parse(query.as_bytes())
        .any(|(key, _)| rules.url_params.iter().any(|denied| *denied == key))
}

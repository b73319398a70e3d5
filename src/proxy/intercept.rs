//! The intercepting transport: every forwarded call passes through here.
//!
//! # Data Flow
//! ```text
//! Request<Bytes>
//!     → deny rules (GET only) ── match ──→ ProxyResponse::Blocked (no I/O)
//!     → query masking (per MaskingScope)
//!     → inner Forwarder::send (exactly once)
//!     → ProxyResponse::Forwarded
//!     → outbound log (observation only)
//! ```

use std::future::Future;
use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::body::Bytes;
use axum::http::uri::PathAndQuery;
use axum::http::{Method, Request, Response, Uri};

use crate::config::{LimitConfig, MaskingScope, PolicySnapshot};
use crate::pii::{mask_raw_query, PiiDetector};
use crate::proxy::forwarder::{Forwarder, TransportError};
use crate::proxy::outcome::ProxyResponse;
use crate::security::should_block_request;

/// Decorates a [`Forwarder`] with deny rules, query masking and response logging.
pub struct InterceptingForwarder<F> {
    inner: F,
    policy: ArcSwap<PolicySnapshot>,
    max_logged_body: usize,
}

impl<F: Forwarder> InterceptingForwarder<F> {
    pub fn new(inner: F, policy: PolicySnapshot) -> Self {
        Self {
            inner,
            policy: ArcSwap::from_pointee(policy),
            max_logged_body: LimitConfig::default().max_logged_body_bytes,
        }
    }

    /// Cap the body bytes carried by the outbound log line.
    pub fn with_max_logged_body(mut self, bytes: usize) -> Self {
        self.max_logged_body = bytes;
        self
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Current policy snapshot.
    pub fn policy(&self) -> Arc<PolicySnapshot> {
        self.policy.load_full()
    }

    /// Replace the policy; requests already in flight keep the old snapshot.
    pub fn swap_policy(&self, policy: PolicySnapshot) {
        self.policy.store(Arc::new(policy));
    }

    /// Decide, mask, forward and log one request.
    ///
    /// Upstream failures are returned as-is and the inner forwarder is never retried.
    pub async fn round_trip(
        &self,
        mut request: Request<Bytes>,
    ) -> Result<ProxyResponse, TransportError> {
        let policy = self.policy.load_full();

        let outcome = if should_block_request(&request, &policy.deny) {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "Request blocked by deny rule"
            );
            ProxyResponse::blocked(request.version())
        } else {
            if masks_method(policy.masking.scope, request.method()) {
                let detector = PiiDetector::from_region_code(&policy.masking.default_region);
                mask_request_query(&mut request, &detector)?;
                tracing::debug!(
                    query = request.uri().query().unwrap_or(""),
                    "Query string after masking values"
                );
            }
            ProxyResponse::Forwarded(self.inner.send(request).await?)
        };

        tracing::info!(response = %outcome.render(self.max_logged_body), "Outbound response");
        Ok(outcome)
    }
}

impl<F: Forwarder> Forwarder for InterceptingForwarder<F> {
    fn send(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>, TransportError>> + Send {
        async move { Ok(self.round_trip(request).await?.into_response()) }
    }
}

fn masks_method(scope: MaskingScope, method: &Method) -> bool {
    match scope {
        MaskingScope::AllMethods => true,
        MaskingScope::DenyScope => method == Method::GET,
    }
}

/// Overwrite the request's query string with its masked encoding.
fn mask_request_query<B>(
    request: &mut Request<B>,
    detector: &PiiDetector,
) -> Result<(), TransportError> {
    let Some(raw) = request.uri().query() else {
        return Ok(());
    };

    let masked = mask_raw_query(raw, detector);
    let path = request.uri().path();
    let path_and_query = if masked.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{masked}")
    };

    let mut parts = request.uri().clone().into_parts();
    parts.path_and_query = Some(
        PathAndQuery::try_from(path_and_query).map_err(|e| TransportError::Uri(e.to_string()))?,
    );
    *request.uri_mut() = Uri::from_parts(parts).map_err(|e| TransportError::Uri(e.to_string()))?;
    Ok(())
}

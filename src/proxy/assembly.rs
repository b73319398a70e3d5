//! Proxy assembly: one backend, one intercepting transport.

use axum::body::{Body, Bytes};
use axum::http::{Request, Response, StatusCode};
use url::Url;

use crate::config::validation::parse_server_url;
use crate::config::{ConfigError, ProxyConfig};
use crate::error::Result;
use crate::http::request::request_as_loggable_string;
use crate::proxy::forwarder::{Forwarder, HttpForwarder};
use crate::proxy::intercept::InterceptingForwarder;

/// Forwarding proxy for a single backend with the intercepting transport installed.
pub struct ReverseProxy<F = HttpForwarder> {
    target: Url,
    transport: InterceptingForwarder<F>,
    max_logged_body: usize,
}

impl ReverseProxy<HttpForwarder> {
    /// Build a proxy for `config.server`.
    ///
    /// Fails with a configuration error if the backend URL does not parse.
    pub fn new(config: &ProxyConfig) -> Result<Self> {
        let target = parse_server_url(&config.server)
            .map_err(|e| ConfigError::Validation(vec![e]))?;
        let forwarder = HttpForwarder::new(target.clone());
        Ok(Self::with_forwarder(target, forwarder, config))
    }
}

impl<F: Forwarder> ReverseProxy<F> {
    pub fn with_forwarder(target: Url, forwarder: F, config: &ProxyConfig) -> Self {
        Self {
            target,
            transport: InterceptingForwarder::new(forwarder, config.policy())
                .with_max_logged_body(config.limits.max_logged_body_bytes),
            max_logged_body: config.limits.max_logged_body_bytes,
        }
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    pub fn transport(&self) -> &InterceptingForwarder<F> {
        &self.transport
    }

    /// Apply a reloaded configuration.
    ///
    /// Only the policy snapshot is swapped; a different backend needs a restart.
    pub fn reload(&self, config: &ProxyConfig) {
        let unchanged = parse_server_url(&config.server)
            .map(|url| url == self.target)
            .unwrap_or(false);
        if !unchanged {
            tracing::warn!(
                current = %self.target,
                requested = %config.server,
                "Backend change ignored until restart"
            );
        }

        self.transport.swap_policy(config.policy());
        tracing::info!(
            deny_headers = config.deny.headers.len(),
            deny_params = config.deny.url_params.len(),
            "Policy snapshot swapped"
        );
    }

    /// Handle one inbound request end to end.
    ///
    /// The inbound request is logged before the deny/mask decision, so the
    /// log line carries unmasked query values and body. Bodies of any size are
    /// forwarded; only the logged copy is cut at `limits.max_logged_body_bytes`.
    pub async fn serve(&self, request: Request<Body>) -> Response<Body> {
        let (parts, body) = request.into_parts();
        let body = match axum::body::to_bytes(body, usize::MAX).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read request body");
                return status_only(StatusCode::BAD_REQUEST);
            }
        };
        let request = Request::from_parts(parts, body);

        tracing::info!(
            request = %request_as_loggable_string(&request, self.max_logged_body),
            "Inbound request"
        );

        match self.transport.round_trip(request).await {
            Ok(outcome) => outcome.into_response().map(Body::from),
            Err(e) => {
                tracing::error!(error = %e, backend = %self.target, "Upstream error");
                status_only(StatusCode::BAD_GATEWAY)
            }
        }
    }
}

fn status_only(status: StatusCode) -> Response<Body> {
    let mut response = Response::new(Body::from(Bytes::new()));
    *response.status_mut() = status;
    response
}

//! Outbound forwarding to the single backend.
//!
//! # Responsibilities
//! - Define the `Forwarder` seam every outbound call goes through
//! - Rewrite the request target onto the backend base URL
//! - Strip hop-by-hop headers, let the client set `Host`, append `X-Forwarded-For`
//! - Buffer the whole backend response so it can be logged and returned unchanged
//!
//! # Design Decisions
//! - Exactly one upstream attempt; failures are returned, never retried
//! - Dropping the returned future aborts the upstream call (client disconnect, timeout)
//! - Upstream traffic is HTTP/1.1 whatever the inbound version

use std::future::Future;
use std::net::{IpAddr, SocketAddr};

use axum::body::{Body, Bytes};
use axum::extract::ConnectInfo;
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::{Request, Response, Uri, Version};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use url::Url;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Headers that describe a single hop and must not be relayed.
const HOP_BY_HOP_HEADERS: [&str; 9] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Failure of the delegated upstream call.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("upstream request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),

    #[error("invalid upstream URI: {0}")]
    Uri(String),

    #[error("upstream body error: {0}")]
    Body(String),
}

/// Sends a buffered request somewhere and returns the buffered response.
pub trait Forwarder: Send + Sync + 'static {
    fn send(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>, TransportError>> + Send;
}

/// Pass-through forwarder targeting one backend base URL.
#[derive(Clone)]
pub struct HttpForwarder {
    target: Url,
    client: Client<HttpConnector, Body>,
}

impl HttpForwarder {
    pub fn new(target: Url) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { target, client }
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    async fn forward(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
        let (mut parts, body) = request.into_parts();

        parts.uri = rewrite_uri(&self.target, &parts.uri)?;
        parts.version = Version::HTTP_11;
        parts.headers.remove(header::HOST);
        remove_hop_by_hop_headers(&mut parts.headers);
        if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
            append_forwarded_for(&mut parts.headers, addr.ip());
        }

        let upstream = Request::from_parts(parts, Body::from(body));
        let response = self.client.request(upstream).await?;

        let (mut parts, body) = response.into_parts();
        remove_hop_by_hop_headers(&mut parts.headers);
        // No size cap: the backend already did the work, so the client gets all of it.
        let bytes = axum::body::to_bytes(Body::new(body), usize::MAX)
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(Response::from_parts(parts, bytes))
    }
}

impl Forwarder for HttpForwarder {
    fn send(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>, TransportError>> + Send {
        self.forward(request)
    }
}

/// Map an inbound request target onto the backend base URL.
///
/// The backend path prefix is joined to the request path with a single slash,
/// and the backend's own query (if any) comes before the request query.
pub fn rewrite_uri(target: &Url, uri: &Uri) -> Result<Uri, TransportError> {
    let host = target
        .host_str()
        .ok_or_else(|| TransportError::Uri(format!("{target} has no host")))?;
    let authority = match target.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    let path = join_paths(target.path(), uri.path());
    let query = match (target.query().filter(|q| !q.is_empty()), uri.query()) {
        (Some(base), Some(own)) if !own.is_empty() => Some(format!("{base}&{own}")),
        (Some(base), _) => Some(base.to_string()),
        (None, own) => own.map(str::to_string),
    };
    let path_and_query = match query {
        Some(q) => format!("{path}?{q}"),
        None => path,
    };

    Uri::builder()
        .scheme(target.scheme())
        .authority(authority)
        .path_and_query(path_and_query)
        .build()
        .map_err(|e| TransportError::Uri(e.to_string()))
}

fn join_paths(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{base}{}", &path[1..]),
        (false, false) => format!("{base}/{path}"),
        _ => format!("{base}{path}"),
    }
}

/// Remove hop-by-hop headers, including any named in `Connection`.
pub fn remove_hop_by_hop_headers(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP_HEADERS {
        headers.remove(name);
    }
}

fn append_forwarded_for(headers: &mut HeaderMap, ip: IpAddr) {
    let prior: Vec<&str> = headers
        .get_all(X_FORWARDED_FOR)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();

    let value = if prior.is_empty() {
        ip.to_string()
    } else {
        format!("{}, {}", prior.join(", "), ip)
    };

    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert(X_FORWARDED_FOR, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_rewrite_root_target() {
        let uri: Uri = "/foo/bar?x=1".parse().unwrap();
        let rewritten = rewrite_uri(&target("http://127.0.0.1:8081"), &uri).unwrap();
        assert_eq!(rewritten.to_string(), "http://127.0.0.1:8081/foo/bar?x=1");
    }

    #[test]
    fn test_rewrite_joins_base_path_and_query() {
        let uri: Uri = "/users?id=7".parse().unwrap();
        let rewritten = rewrite_uri(&target("http://backend/api/?key=k"), &uri).unwrap();
        assert_eq!(rewritten.to_string(), "http://backend/api/users?key=k&id=7");

        let uri: Uri = "/".parse().unwrap();
        let rewritten = rewrite_uri(&target("http://backend/api?key=k"), &uri).unwrap();
        assert_eq!(rewritten.to_string(), "http://backend/api/?key=k");
    }

    #[test]
    fn test_join_paths() {
        assert_eq!(join_paths("/", "/a"), "/a");
        assert_eq!(join_paths("/base", "/a"), "/base/a");
        assert_eq!(join_paths("/base/", "a"), "/base/a");
        assert_eq!(join_paths("/base", "a"), "/base/a");
    }

    #[test]
    fn test_remove_hop_by_hop_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("close, x-private"));
        headers.insert("x-private", HeaderValue::from_static("secret"));
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert(header::USER_AGENT, HeaderValue::from_static("curl"));

        remove_hop_by_hop_headers(&mut headers);

        assert_eq!(headers.len(), 1);
        assert_eq!(headers[header::USER_AGENT], "curl");
    }

    #[test]
    fn test_append_forwarded_for() {
        let mut headers = HeaderMap::new();
        append_forwarded_for(&mut headers, "10.0.0.1".parse().unwrap());
        assert_eq!(headers[X_FORWARDED_FOR], "10.0.0.1");

        append_forwarded_for(&mut headers, "10.0.0.2".parse().unwrap());
        assert_eq!(headers[X_FORWARDED_FOR], "10.0.0.1, 10.0.0.2");
    }
}

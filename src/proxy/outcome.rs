//! Outcome of a trip through the intercepting transport.

use axum::body::Bytes;
use axum::http::{Response, StatusCode, Version};

use crate::http::response::response_as_loggable_string;

/// What the proxy hands back for a request.
#[derive(Debug)]
pub enum ProxyResponse {
    /// Rejected by a deny rule; synthesized locally, never sent upstream.
    Blocked {
        /// Protocol version of the rejected request, echoed in the reply.
        version: Version,
    },
    /// The backend's response, passed through unmodified.
    Forwarded(Response<Bytes>),
}

impl ProxyResponse {
    pub fn blocked(version: Version) -> Self {
        Self::Blocked { version }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Blocked { .. } => StatusCode::FORBIDDEN,
            Self::Forwarded(response) => response.status(),
        }
    }

    /// Wire-style dump of the response for the outbound log, body cut at `max_body` bytes.
    pub fn render(&self, max_body: usize) -> String {
        match self {
            Self::Blocked { version } => {
                response_as_loggable_string(&blocked_response(*version), max_body)
            }
            Self::Forwarded(response) => response_as_loggable_string(response, max_body),
        }
    }

    pub fn into_response(self) -> Response<Bytes> {
        match self {
            Self::Blocked { version } => blocked_response(version),
            Self::Forwarded(response) => response,
        }
    }
}

/// 403 with no headers and an empty body.
fn blocked_response(version: Version) -> Response<Bytes> {
    let mut response = Response::new(Bytes::new());
    *response.status_mut() = StatusCode::FORBIDDEN;
    *response.version_mut() = version;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_response_shape() {
        let outcome = ProxyResponse::blocked(Version::HTTP_2);
        assert!(outcome.is_blocked());
        assert_eq!(outcome.status(), StatusCode::FORBIDDEN);
        assert_eq!(outcome.render(usize::MAX), "HTTP/2.0 403 Forbidden\n\n");

        let response = outcome.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(response.version(), Version::HTTP_2);
        assert!(response.headers().is_empty());
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_forwarded_passes_through() {
        let upstream = Response::builder()
            .status(StatusCode::CREATED)
            .header("x-backend", "1")
            .body(Bytes::from_static(b"made"))
            .unwrap();

        let outcome = ProxyResponse::Forwarded(upstream);
        assert!(!outcome.is_blocked());
        assert_eq!(outcome.status(), StatusCode::CREATED);

        let response = outcome.into_response();
        assert_eq!(response.headers()["x-backend"], "1");
        assert_eq!(response.body().as_ref(), b"made");
    }
}

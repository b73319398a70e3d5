//! Request rendering for logs.
//!
//! # Responsibilities
//! - Render a buffered request as a wire-style dump (request line, headers, body)
//! - Cut long bodies in the dump; the forwarded body is never shortened
//!
//! # Design Decisions
//! - The inbound dump is taken before the deny/mask decision, so it shows
//!   query values and bodies unmasked
//! - Non-UTF-8 body bytes are rendered lossily; the request itself is untouched

use std::fmt::Write;

use axum::http::Request;

/// Render `request` as `METHOD TARGET VERSION`, headers, a blank line, then
/// at most `max_body` bytes of the body.
pub fn request_as_loggable_string<B: AsRef<[u8]>>(
    request: &Request<B>,
    max_body: usize,
) -> String {
    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let mut out = format!(
        "{} {} {:?}\n",
        request.method(),
        target,
        request.version()
    );
    for (name, value) in request.headers() {
        let _ = writeln!(out, "{}: {}", name, String::from_utf8_lossy(value.as_bytes()));
    }
    out.push('\n');
    push_body(&mut out, request.body().as_ref(), max_body);
    out
}

/// Append `body` lossily, eliding everything past `max_body` bytes.
pub(crate) fn push_body(out: &mut String, body: &[u8], max_body: usize) {
    if body.len() <= max_body {
        out.push_str(&String::from_utf8_lossy(body));
        return;
    }
    out.push_str(&String::from_utf8_lossy(&body[..max_body]));
    let _ = write!(out, "\n... ({} bytes truncated)", body.len() - max_body);
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::{Method, Version};

    #[test]
    fn test_request_line_includes_version() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/foo")
            .version(Version::HTTP_2)
            .header("host", "localhost:9090")
            .body(Bytes::new())
            .unwrap();

        let dump = request_as_loggable_string(&request, usize::MAX);
        assert!(dump.starts_with("GET /foo HTTP/2.0\n"), "{dump}");
        assert!(dump.contains("host: localhost:9090\n"));
    }

    #[test]
    fn test_dump_includes_query_and_body() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("http://localhost:9090/submit?email=paul%40gmail.com")
            .body(Bytes::from_static(b"{\"a\":1}"))
            .unwrap();

        let dump = request_as_loggable_string(&request, usize::MAX);
        assert!(dump.starts_with("POST /submit?email=paul%40gmail.com HTTP/1.1\n"));
        assert!(dump.ends_with("\n\n{\"a\":1}"));
    }

    #[test]
    fn test_long_body_is_truncated_in_dump_only() {
        let body = Bytes::from(vec![b'a'; 64]);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/upload")
            .body(body.clone())
            .unwrap();

        let dump = request_as_loggable_string(&request, 10);
        assert!(dump.ends_with("\n\naaaaaaaaaa\n... (54 bytes truncated)"), "{dump}");
        assert_eq!(request.body().len(), 64);

        let full = request_as_loggable_string(&request, 64);
        assert!(full.ends_with(&"a".repeat(64)));
        assert!(!full.contains("truncated"));
    }
}

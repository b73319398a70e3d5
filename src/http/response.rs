//! Response rendering for logs.
//!
//! # Responsibilities
//! - Render a buffered response as a wire-style dump (status line, headers, body)
//!
//! # Design Decisions
//! - Rendering borrows the response; the returned body is never cut, only its dump

use std::fmt::Write;

use axum::http::Response;

use crate::http::request::push_body;

/// Render `response` as `VERSION STATUS REASON`, headers, a blank line, then
/// at most `max_body` bytes of the body.
pub fn response_as_loggable_string<B: AsRef<[u8]>>(
    response: &Response<B>,
    max_body: usize,
) -> String {
    let status = response.status();
    let mut out = format!(
        "{:?} {} {}\n",
        response.version(),
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    );
    for (name, value) in response.headers() {
        let _ = writeln!(out, "{}: {}", name, String::from_utf8_lossy(value.as_bytes()));
    }
    out.push('\n');
    push_body(&mut out, response.body().as_ref(), max_body);
    out
}

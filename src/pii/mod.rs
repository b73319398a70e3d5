//! PII detection and masking subsystem.
//!
//! # Data Flow
//! ```text
//! raw query string
//!     → query.rs (decode into key → [values])
//!     → detector.rs (email? phone?)
//!     → mask.rs (same-length redaction)
//!     → query.rs (re-encode)
//! ```
//!
//! # Design Decisions
//! - Only query values are masked; keys, headers and bodies are untouched
//! - Masking is irreversible and length-preserving (in code points)
//! - Every function here is pure

pub mod detector;
pub mod mask;
pub mod query;

pub use detector::{looks_like_email, looks_like_phone, PiiDetector};
pub use mask::mask_value;
pub use query::{encode_query, mask_query_parameters, mask_raw_query, parse_query, QueryParams};

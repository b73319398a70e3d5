//! Forwarding proxy subsystem.
//!
//! # Data Flow
//! ```text
//! axum handler
//!     → assembly.rs (buffer body, log inbound request unmasked)
//!     → intercept.rs (deny? mask query, log outbound response)
//!     → forwarder.rs (rewrite target, relay to backend)
//!     → outcome.rs (Blocked | Forwarded)
//!     → client
//! ```
//!
//! # Design Decisions
//! - `Forwarder` is the only seam: the pass-through client and the
//!   intercepting decorator both implement it
//! - A blocked request is a distinct variant, not a hand-built response
//! - Requests are independent; the only shared state is the policy snapshot

pub mod assembly;
pub mod forwarder;
pub mod intercept;
pub mod outcome;

pub use assembly::ReverseProxy;
pub use forwarder::{Forwarder, HttpForwarder, TransportError};
pub use intercept::InterceptingForwarder;
pub use outcome::ProxyResponse;

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! proxy/assembly.rs  → inbound request dump (unmasked)
//! proxy/intercept.rs → outbound response dump, block decisions
//! http/server.rs     → request spans (TraceLayer), x-request-id
//!     → logging.rs (tracing subscriber, stdout)
//! ```

pub mod logging;

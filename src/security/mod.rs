//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Request (after inbound logging)
//!     → deny.rs (GET + denied header / denied query param?)
//!     → block: 403 synthesized locally, no backend call
//!     → allow: continue to query masking and forwarding
//! ```

pub mod deny;

pub use deny::should_block_request;

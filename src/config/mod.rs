//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (JSON, path from argv[1] or "config.json")
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc to the proxy at startup
//!
//! On reload (--watch):
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of Arc<PolicySnapshot>
//!     → in-flight requests keep the snapshot they started with
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes replace the whole snapshot
//! - Backend and listener changes require a restart
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    DenyRules, LimitConfig, ListenerConfig, MaskingConfig, MaskingScope, ObservabilityConfig,
    PolicySnapshot, ProxyConfig, TimeoutConfig,
};
pub use validation::ValidationError;

//! Masking reverse proxy library.
//!
//! Relays requests to a single backend. GET requests matching a deny rule
//! are answered with 403 locally; every other request has email- and
//! phone-shaped query values masked before it is forwarded.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pii;
pub mod proxy;
pub mod security;

pub use config::schema::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use proxy::ReverseProxy;

//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all route)
//!     → request.rs (inbound dump for logs)
//!     → [proxy: deny / mask / forward]
//!     → response.rs (outbound dump for logs)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::request_as_loggable_string;
pub use response::response_as_loggable_string;
pub use server::HttpServer;

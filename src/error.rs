use thiserror::Error;

use crate::config::ConfigError;
use crate::proxy::TransportError;

/// Top-level error type for building and running the proxy.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts() {
        let err: ProxyError = ConfigError::Validation(vec![]).into();
        assert!(matches!(err, ProxyError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn transport_error_displays_message() {
        let err: ProxyError = TransportError::Uri("bad authority".into()).into();
        assert_eq!(
            err.to_string(),
            "Transport error: invalid upstream URI: bad authority"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProxyError>();
    }
}

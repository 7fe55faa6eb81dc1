//! Error types for puissant-relay

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// RPC-related errors
    #[error("{0}")]
    Rpc(#[from] RpcError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// RPC-specific errors
#[derive(Error, Debug)]
pub enum RpcError {
    /// The validator is inactive, or a remote fault could not be decoded.
    /// The fixed message is what callers of the relayed method see.
    #[error("the method eth_sendPuissant does not exist/is not available")]
    MethodUnavailable,

    /// The remote peer returned a structured JSON-RPC fault; the message is
    /// surfaced verbatim.
    #[error("{0}")]
    Rejected(String),

    /// The aggregate call's deadline fired before the batch completed.
    #[error("request timeout")]
    Timeout,

    #[error("json rpc call failed, method:{method}, url:{url}")]
    CallFailed { method: String, url: String },

    #[error("json rpc call failed, method:{method}, url:{url}, code:{code}")]
    HttpStatus {
        method: String,
        url: String,
        code: u16,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config file: {0}")]
    InvalidFile(String),

    #[error("Config file parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_message() {
        assert_eq!(
            RpcError::MethodUnavailable.to_string(),
            "the method eth_sendPuissant does not exist/is not available"
        );
    }

    #[test]
    fn test_rejected_message_is_verbatim() {
        let err = Error::from(RpcError::Rejected("insufficient funds".to_string()));
        assert_eq!(err.to_string(), "insufficient funds");
    }

    #[test]
    fn test_timeout_message() {
        assert_eq!(RpcError::Timeout.to_string(), "request timeout");
    }
}

//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the ecommerce MCP server.
#[derive(Error, Debug)]
pub enum Error {
    /// Credentials were not supplied at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The catalog service answered with a non-success status.
    #[error("remote error: {status} {status_text}")]
    Remote { status: u16, status_text: String },

    /// The catalog service answered with a body we could not interpret.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Transport-level failure (DNS, refused connection, TLS, ...).
    #[error("network error: {0}")]
    Network(String),

    /// Timeout (request exceeded the configured deadline).
    #[error("timeout: {0}")]
    Timeout(String),

    /// Validation errors (bad tool arguments, empty identifiers).
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal errors.
    #[error("internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Stable machine-readable code carried in tool error payloads.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "CONFIGURATION_ERROR",
            Error::Remote { .. } => "REMOTE_ERROR",
            Error::MalformedResponse(_) => "MALFORMED_RESPONSE",
            Error::Network(_) => "NETWORK_ERROR",
            Error::Timeout(_) => "TIMEOUT",
            Error::Validation(_) => "INVALID_ARGUMENT",
            Error::Internal(_) | Error::Serialization(_) => "INTERNAL",
        }
    }
}

// Convenience constructors
impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn remote(status: u16, status_text: impl Into<String>) -> Self {
        Self::Remote {
            status,
            status_text: status_text.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

// Timeouts are reported separately so callers can tell a slow catalog from a dead one.
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(err.to_string())
        } else if err.is_decode() {
            Error::MalformedResponse(err.to_string())
        } else {
            Error::Network(err.to_string())
        }
    }
}

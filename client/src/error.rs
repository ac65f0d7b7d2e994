//! Error types for A10 API access.
//!
//! Covers transport failures (connecting, reading, writing), protocol
//! failures (bad HTTP, bad JSON, API-level errors), and configuration
//! loading.

use thiserror::Error;

/// Errors that can occur while talking to the A10 API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// `HOST[:PORT]` could not be parsed.
    #[error("invalid endpoint '{0}': expected HOST[:PORT]")]
    InvalidEndpoint(String),

    /// Connection, read, or write failure.
    #[error("transport error talking to {endpoint}: {source}")]
    Transport {
        /// Endpoint being contacted.
        endpoint: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Non-2xx HTTP status.
    #[error("HTTP {status} {reason}")]
    HttpStatus {
        /// Numeric status code.
        status: u16,
        /// Reason phrase from the status line.
        reason: String,
    },

    /// Response that is not valid HTTP.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Response body is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered with a failure envelope.
    #[error("API error {code}: {message}")]
    Api {
        /// A10 error code.
        code: i64,
        /// A10 error message.
        message: String,
    },

    /// Expected field missing from an API response.
    #[error("response is missing field: {0}")]
    MissingField(String),

    /// Configuration file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ClientError {
    /// Returns `true` if the device could not be reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport { .. })
    }

    /// Returns `true` if the device answered but the answer was unusable.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            ClientError::HttpStatus { .. }
                | ClientError::MalformedResponse(_)
                | ClientError::Json(_)
                | ClientError::Api { .. }
                | ClientError::MissingField(_)
        )
    }
}

/// Convenience alias for results with [`ClientError`].
pub type Result<T> = std::result::Result<T, ClientError>;

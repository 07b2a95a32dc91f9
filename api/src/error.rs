//! Error types for the todo-list service client

use thiserror::Error;

/// Transport-level failures talking to the todo-list service
///
/// Application-level rejections (`resultCode != 0`) are not errors at this
/// layer; they come back as a [`crate::ResponseEnvelope`] for the caller to
/// inspect.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS)
    #[error("Request failed: {0}")]
    Request(String),

    /// The service answered with a non-2xx HTTP status
    #[error("Unexpected HTTP status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// The response body did not match the expected shape
    #[error("Response decoding failed: {0}")]
    Decode(String),

    /// Client configuration is unusable
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}

//! Error types for the escalation boundary.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LlmError>;

#[derive(Debug, Error)]
pub enum LlmError {
    /// Missing API key or unusable client configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Connectivity failure or timeout (retryable).
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP response from the service.
    #[error("service returned {status}: {body}")]
    Server { status: u16, body: String },

    /// Provider-imposed rate limit (retryable with backoff).
    #[error("rate limited: {0}")]
    RateLimit(String),

    /// Response body did not carry the expected structure.
    #[error("malformed payload: {0}")]
    Payload(String),
}

impl LlmError {
    /// Network faults and rate limits are worth retrying; everything else
    /// fails the call.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::RateLimit(_))
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Network(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Payload(err.to_string())
    }
}

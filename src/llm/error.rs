//! Error types for completion backends.

use thiserror::Error;

/// Failures a completion backend can report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// The call did not finish within the configured timeout.
    #[error("completion request timed out")]
    Timeout,

    /// The service rejected the credential.
    #[error("completion service rejected the credential")]
    Authentication,

    /// The service asked the caller to slow down.
    #[error("completion service rate limited the request")]
    RateLimited {
        /// Seconds the service asked to wait, when provided.
        retry_after_seconds: Option<u64>,
    },

    /// The response could not be interpreted.
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),

    /// Transport failure or unexpected status.
    #[error("completion service unavailable: {0}")]
    Unavailable(String),
}

impl CompletionError {
    /// Build an error from a reqwest transport failure.
    #[must_use]
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Unavailable(err.to_string())
        }
    }

    /// Map a non-success HTTP status to an error.
    #[must_use]
    pub fn from_status(status: u16, retry_after_seconds: Option<u64>) -> Self {
        match status {
            401 | 403 => Self::Authentication,
            429 => Self::RateLimited {
                retry_after_seconds,
            },
            408 | 504 => Self::Timeout,
            other => Self::Unavailable(format!("http status {other}")),
        }
    }

    /// Check if a caller could reasonably retry this error.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::RateLimited { .. } | Self::Unavailable(_)
        )
    }
}

//! Chat completion client errors.

use thiserror::Error;
use whys_engine::GenerationError;

#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// Failed to interpret a provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The provider returned 429 Too Many Requests.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// No API key is configured.
    #[error("LLM provider is not configured (set WHYS_LLM__API_KEY)")]
    NotConfigured,
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Http(e) => Self::Transport(e.to_string()),
            LlmError::Api { status, message } => Self::Api { status, message },
            LlmError::Parse(msg) => Self::Malformed(msg),
            LlmError::RateLimited { retry_after_secs } => Self::RateLimited { retry_after_secs },
            err @ LlmError::NotConfigured => Self::Unavailable(err.to_string()),
        }
    }
}

//! Error types for the engine and its collaborators.

use whys_core::enums::ErrorClass;
use whys_core::errors::CoreError;

/// Failure reported by a [`Generator`](crate::Generator).
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The generator could not be reached or the request did not complete.
    #[error("generation transport error: {0}")]
    Transport(String),

    /// Provider rate limit exceeded.
    #[error("generation rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Provider returned an error status.
    #[error("generation API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The reply could not be interpreted.
    #[error("malformed generation reply: {0}")]
    Malformed(String),

    /// The generator returned no usable text.
    #[error("generator returned empty text")]
    Empty,

    /// The generator is not usable (e.g. missing credentials).
    #[error("generator unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by a [`SessionStore`](crate::SessionStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session not found: {0}")]
    NotFound(String),

    /// The session exists but its lifetime has elapsed.
    #[error("session expired: {0}")]
    Expired(String),

    /// Storage backend fault.
    #[error("session store error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Caller-facing error for every [`CausalEngine`](crate::CausalEngine) operation.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("session not found: {0}")]
    NotFound(String),

    #[error("session expired: {0}")]
    Expired(String),

    /// Operation not valid in the session's current state.
    #[error("invalid step: {0}")]
    InvalidStep(String),

    /// Blank problem statement or answer.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The generation capability failed.
    #[error(transparent)]
    Upstream(#[from] GenerationError),

    /// Store backend fault or a broken invariant.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    #[must_use]
    pub const fn classification(&self) -> ErrorClass {
        match self {
            Self::NotFound(_) => ErrorClass::NotFound,
            Self::Expired(_) => ErrorClass::Expired,
            Self::InvalidStep(_) => ErrorClass::InvalidStep,
            Self::InvalidInput(_) => ErrorClass::InvalidInput,
            Self::Upstream(_) => ErrorClass::UpstreamError,
            Self::Internal(_) => ErrorClass::InternalError,
        }
    }

    /// Variant name, used as the `code` of rendered error bodies.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NotFound",
            Self::Expired(_) => "Expired",
            Self::InvalidStep(_) => "InvalidStep",
            Self::InvalidInput(_) => "InvalidInput",
            Self::Upstream(_) => "UpstreamError",
            Self::Internal(_) => "InternalError",
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::Expired(id) => Self::Expired(id),
            StoreError::Backend(e) => Self::Internal(format!("{e:#}")),
        }
    }
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::InvalidInput(msg),
            CoreError::InvalidStep(msg) => Self::InvalidStep(msg),
            err @ CoreError::InvalidTransition { .. } => Self::InvalidStep(err.to_string()),
            CoreError::Other(e) => Self::Internal(format!("{e:#}")),
        }
    }
}

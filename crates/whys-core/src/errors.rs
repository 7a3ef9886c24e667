//! Cross-cutting error types for Whys.
//!
//! This module defines errors raised by the session state machine itself.
//! Collaborator errors (`GenerationError`, `StoreError`, `DatabaseError`) are
//! defined in their respective crates and converge in `whys-engine`'s
//! `EngineError`, which carries the caller-facing [`ErrorClass`].

use thiserror::Error;

use crate::enums::ErrorClass;

/// Errors that can be raised by the session data model.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An operation was called out of order (answering a completed session,
    /// finalizing before enough answers, advancing with no pending answer).
    #[error("Invalid step: {0}")]
    InvalidStep(String),

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: session {id} from {from} to {to}")]
    InvalidTransition { id: String, from: String, to: String },

    /// Input failed validation (blank problem or answer text).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    /// Caller-facing classification of this error.
    #[must_use]
    pub const fn classification(&self) -> ErrorClass {
        match self {
            Self::InvalidStep(_) | Self::InvalidTransition { .. } => ErrorClass::InvalidStep,
            Self::Validation(_) => ErrorClass::InvalidInput,
            Self::Other(_) => ErrorClass::InternalError,
        }
    }
}

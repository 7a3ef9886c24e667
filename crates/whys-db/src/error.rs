//! Database error types for whys-db.

use thiserror::Error;
use whys_engine::StoreError;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned malformed data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// No session with this id.
    #[error("Session not found: {0}")]
    NotFound(String),

    /// The session exists but its lifetime has elapsed.
    #[error("Session expired: {0}")]
    Expired(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(id) => Self::NotFound(id),
            DatabaseError::Expired(id) => Self::Expired(id),
            DatabaseError::Other(e) => Self::Backend(e),
            other => Self::Backend(anyhow::Error::new(other)),
        }
    }
}

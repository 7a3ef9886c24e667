//! # whys-db
//!
//! libSQL storage for Whys sessions and the JSONL event trail.
//!
//! [`WhysDb`] implements the engine's `SessionStore`: each session is kept as
//! one JSON document plus the columns needed to list and expire it.
//! [`trail::TrailWriter`] implements `EventSink` and appends engine events to
//! `.whys/trail/{session_id}.jsonl`.

pub mod error;
pub mod helpers;
mod migrations;
pub mod sessions;
pub mod trail;

use chrono::TimeDelta;
use error::DatabaseError;
use libsql::Builder;
use whys_engine::store::DEFAULT_TTL_SECS;

/// Database handle for session state.
pub struct WhysDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    ttl: TimeDelta,
}

impl WhysDb {
    /// Open a local database at `path` (`":memory:"` for an in-process one)
    /// with the default 30 minute session lifetime.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        Self::open_with_ttl(path, TimeDelta::seconds(DEFAULT_TTL_SECS)).await
    }

    /// Open a local database whose new sessions live for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_with_ttl(path: &str, ttl: TimeDelta) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        let whys_db = Self { db, conn, ttl };
        whys_db.run_migrations().await?;
        tracing::debug!(path, ttl_secs = ttl.num_seconds(), "db: opened");
        Ok(whys_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    #[must_use]
    pub const fn ttl(&self) -> TimeDelta {
        self.ttl
    }
}

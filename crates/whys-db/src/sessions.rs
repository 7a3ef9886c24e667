//! Session repository and the `SessionStore` implementation.
//!
//! `create` stamps `expires_at = now + ttl`; `save` rewrites the document and
//! keeps that deadline. Reads past the deadline report `Expired` until
//! [`WhysDb::purge_expired`] removes the row.

use chrono::Utc;
use whys_core::entities::CausalSession;
use whys_core::responses::SessionListing;
use whys_engine::{SessionStore, StoreError};

use crate::WhysDb;
use crate::error::DatabaseError;
use crate::helpers::{format_datetime, from_millis, parse_datetime, parse_enum, to_millis};

fn to_body(session: &CausalSession) -> Result<String, DatabaseError> {
    serde_json::to_string(session).map_err(|e| DatabaseError::Other(e.into()))
}

fn step_column(session: &CausalSession) -> i64 {
    i64::try_from(session.step()).unwrap_or(i64::MAX)
}

fn row_to_listing(row: &libsql::Row, now_ms: i64) -> Result<SessionListing, DatabaseError> {
    let step: i64 = row.get(3)?;
    let expires_ms: i64 = row.get(5)?;
    Ok(SessionListing {
        id: row.get(0)?,
        problem: row.get(1)?,
        status: parse_enum(&row.get::<String>(2)?)?,
        step: usize::try_from(step)
            .map_err(|_| DatabaseError::Query(format!("negative step: {step}")))?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        expires_at: from_millis(expires_ms)?,
        expired: now_ms >= expires_ms,
    })
}

impl WhysDb {
    /// Insert a new session with a fresh lifetime.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if serialization or the INSERT fails
    /// (including a duplicate id).
    pub async fn insert_session(&self, session: &CausalSession) -> Result<(), DatabaseError> {
        let expires_at = Utc::now() + self.ttl;
        self.conn
            .execute(
                "INSERT INTO sessions (id, problem, status, step, body, created_at, updated_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                libsql::params![
                    session.id.as_str(),
                    session.problem.as_str(),
                    session.status.as_str(),
                    step_column(session),
                    to_body(session)?,
                    format_datetime(session.created_at),
                    format_datetime(session.updated_at),
                    to_millis(expires_at)
                ],
            )
            .await?;
        tracing::debug!(session = %session.id, "db: session inserted");
        Ok(())
    }

    /// Load a live session.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown ids, `Expired` past the deadline, `Query` if
    /// the stored document is unreadable.
    pub async fn get_session(&self, id: &str) -> Result<CausalSession, DatabaseError> {
        let mut rows = self
            .conn
            .query("SELECT body, expires_at FROM sessions WHERE id = ?1", [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::NotFound(id.to_string()))?;
        let expires_ms: i64 = row.get(1)?;
        if to_millis(Utc::now()) >= expires_ms {
            return Err(DatabaseError::Expired(id.to_string()));
        }
        let body: String = row.get(0)?;
        serde_json::from_str(&body)
            .map_err(|e| DatabaseError::Query(format!("corrupt session {id}: {e}")))
    }

    /// Overwrite a live session, keeping its deadline.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Expired` when no live row matches, plus query errors.
    pub async fn update_session(&self, session: &CausalSession) -> Result<(), DatabaseError> {
        let changed = self
            .conn
            .execute(
                "UPDATE sessions SET status = ?2, step = ?3, body = ?4, updated_at = ?5
                 WHERE id = ?1 AND expires_at > ?6",
                libsql::params![
                    session.id.as_str(),
                    session.status.as_str(),
                    step_column(session),
                    to_body(session)?,
                    format_datetime(session.updated_at),
                    to_millis(Utc::now())
                ],
            )
            .await?;
        if changed == 0 {
            // Distinguish a missing row from an expired one.
            self.get_session(&session.id).await?;
            return Err(DatabaseError::Expired(session.id.clone()));
        }
        Ok(())
    }

    /// Most recent sessions first, expired ones included and flagged.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query or row parsing fails.
    pub async fn list_sessions(&self, limit: u32) -> Result<Vec<SessionListing>, DatabaseError> {
        let now_ms = to_millis(Utc::now());
        let mut rows = self
            .conn
            .query(
                "SELECT id, problem, status, step, created_at, expires_at FROM sessions
                 ORDER BY created_at DESC, id LIMIT ?1",
                [i64::from(limit)],
            )
            .await?;
        let mut listings = Vec::new();
        while let Some(row) = rows.next().await? {
            listings.push(row_to_listing(&row, now_ms)?);
        }
        Ok(listings)
    }

    /// Delete every expired session. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the DELETE fails.
    pub async fn purge_expired(&self) -> Result<u64, DatabaseError> {
        let removed = self
            .conn
            .execute(
                "DELETE FROM sessions WHERE expires_at <= ?1",
                [to_millis(Utc::now())],
            )
            .await?;
        if removed > 0 {
            tracing::info!(removed, "db: purged expired sessions");
        }
        Ok(removed)
    }
}

impl SessionStore for WhysDb {
    async fn create(&self, session: &CausalSession) -> Result<(), StoreError> {
        Ok(self.insert_session(session).await?)
    }

    async fn load(&self, id: &str) -> Result<CausalSession, StoreError> {
        Ok(self.get_session(id).await?)
    }

    async fn save(&self, session: &CausalSession) -> Result<(), StoreError> {
        Ok(self.update_session(session).await?)
    }
}

//! Session persistence boundary and the in-process store.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, Utc};
use whys_core::entities::CausalSession;

use crate::error::StoreError;

/// Default session lifetime: 30 minutes from creation.
pub const DEFAULT_TTL_SECS: i64 = 1800;

/// Where sessions live between operations.
///
/// `load` reports `NotFound` for unknown ids and `Expired` once a session's
/// lifetime has elapsed. `save` keeps the lifetime set at `create`.
pub trait SessionStore: Send + Sync {
    fn create(
        &self,
        session: &CausalSession,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn load(&self, id: &str) -> impl Future<Output = Result<CausalSession, StoreError>> + Send;

    fn save(&self, session: &CausalSession)
    -> impl Future<Output = Result<(), StoreError>> + Send;
}

struct Entry {
    session: CausalSession,
    expires_at: DateTime<Utc>,
}

/// TTL-aware in-memory store. Used for ephemeral runs and tests.
pub struct MemoryStore {
    ttl: TimeDelta,
    entries: Mutex<HashMap<String, Entry>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(TimeDelta::seconds(DEFAULT_TTL_SECS))
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of stored sessions, expired ones included.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Entry>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("memory store lock poisoned")))
    }

    fn live<'a>(
        entries: &'a mut HashMap<String, Entry>,
        id: &str,
    ) -> Result<&'a mut Entry, StoreError> {
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if Utc::now() >= entry.expires_at {
            return Err(StoreError::Expired(id.to_string()));
        }
        Ok(entry)
    }
}

impl SessionStore for MemoryStore {
    async fn create(&self, session: &CausalSession) -> Result<(), StoreError> {
        let expires_at = Utc::now() + self.ttl;
        self.lock()?.insert(
            session.id.clone(),
            Entry {
                session: session.clone(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<CausalSession, StoreError> {
        let mut entries = self.lock()?;
        Self::live(&mut entries, id).map(|e| e.session.clone())
    }

    async fn save(&self, session: &CausalSession) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        let entry = Self::live(&mut entries, &session.id)?;
        entry.session = session.clone();
        Ok(())
    }
}

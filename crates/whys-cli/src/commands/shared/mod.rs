use chrono::{DateTime, Utc};
use serde::Serialize;
use whys_core::entities::{CausalSession, SessionSnapshot};
use whys_engine::depth::compute_depth;

use crate::callback;

/// Snapshot with the session's current depth.
#[must_use]
pub fn snapshot(session: &CausalSession) -> SessionSnapshot {
    SessionSnapshot::of(session, compute_depth(session))
}

/// Whether the session completed at or after `since`, i.e. during this
/// command rather than an earlier one.
#[must_use]
pub fn completed_since(session: &CausalSession, since: DateTime<Utc>) -> bool {
    session.completed_at.is_some_and(|at| at >= since)
}

/// POST `payload` to the callback URL, if one is configured.
pub async fn notify_completion<T: Serialize + Sync>(callback_url: Option<&str>, payload: &T) {
    if let Some(url) = callback_url {
        callback::notify(url, payload).await;
    }
}

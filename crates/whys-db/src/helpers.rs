//! Row parsing and timestamp helpers.
//!
//! Timestamps shown to users are RFC 3339 TEXT; `expires_at` is stored as
//! epoch milliseconds so expiry checks are plain integer comparisons.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::DatabaseError;

/// Parse a TEXT column as `DateTime<Utc>`.
///
/// Accepts RFC 3339 and `SQLite`'s `datetime('now')` format.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if neither format matches.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a TEXT column into a `snake_case` serde enum.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string matches no variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Fixed-width RFC 3339 (microseconds, `Z`) so TEXT ordering matches time ordering.
#[must_use]
pub fn format_datetime(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Epoch milliseconds for an `expires_at` column.
#[must_use]
pub fn to_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

/// Inverse of [`to_millis`].
///
/// # Errors
///
/// Returns `DatabaseError::Query` for out-of-range values.
pub fn from_millis(ms: i64) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| DatabaseError::Query(format!("timestamp out of range: {ms}")))
}

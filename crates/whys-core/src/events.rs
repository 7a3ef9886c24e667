//! Observability events and their JSONL trail envelope.
//!
//! The engine emits an [`EngineEvent`] for every classification, every issued
//! question, and every finalization. Each carries the same [`Signals`] block so
//! downstream sinks (structured logs, `.whys/trail/{session_id}.jsonl`) can be
//! aggregated without knowing the event kind.
//!
//! The `v` field supports envelope versioning: old trail files without a `v`
//! field deserialize with `v == 1` via `#[serde(default)]`.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AnswerType, PivotMode};

/// Default trail version for backward compatibility with old JSONL files.
const fn default_trail_version() -> u32 {
    1
}

/// Counters and decisions exposed per event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Signals {
    pub answer_type: Option<AnswerType>,
    pub pivot_mode: Option<PivotMode>,
    pub depth_score: u32,
    /// Process-wide count of `Unknown` answers.
    pub unknown_count: u64,
    pub unknown_streak: u32,
    /// Pivot selections for the session.
    pub evidence_pivots: u32,
    pub dedup_retries_total: u64,
    pub dedup_duplicates_accepted: u64,
}

/// What happened.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineEvent {
    /// An answer was recorded and classified.
    Classified {
        session_id: String,
        step: usize,
        signals: Signals,
    },
    /// A question was issued under a pivot mode.
    Steered {
        session_id: String,
        question_index: usize,
        attempts: u32,
        duplicate_accepted: bool,
        signals: Signals,
    },
    /// The root cause was synthesized and the session completed.
    Finalized {
        session_id: String,
        factors: usize,
        used_fallback: bool,
        signals: Signals,
    },
}

impl EngineEvent {
    #[must_use]
    pub fn session_id(&self) -> &str {
        match self {
            Self::Classified { session_id, .. }
            | Self::Steered { session_id, .. }
            | Self::Finalized { session_id, .. } => session_id,
        }
    }

    #[must_use]
    pub const fn signals(&self) -> &Signals {
        match self {
            Self::Classified { signals, .. }
            | Self::Steered { signals, .. }
            | Self::Finalized { signals, .. } => signals,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Classified { .. } => "classified",
            Self::Steered { .. } => "steered",
            Self::Finalized { .. } => "finalized",
        }
    }
}

/// A single event recorded in the JSONL trail.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TrailEvent {
    /// Envelope version. Defaults to 1 for old trails without this field.
    #[serde(default = "default_trail_version")]
    pub v: u32,

    /// Time the event was recorded.
    pub ts: DateTime<Utc>,

    /// Session ID that produced this event.
    pub ses: String,

    pub event: EngineEvent,
}

impl TrailEvent {
    /// Wrap an event in a version-1 envelope stamped `ts`.
    #[must_use]
    pub fn new(event: EngineEvent, ts: DateTime<Utc>) -> Self {
        Self {
            v: default_trail_version(),
            ts,
            ses: event.session_id().to_string(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_with_kind_tag() {
        let event = EngineEvent::Classified {
            session_id: "rca-a3f8b2c1".into(),
            step: 2,
            signals: Signals {
                answer_type: Some(AnswerType::Vague),
                ..Signals::default()
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "classified");
        assert_eq!(json["signals"]["answer_type"], "vague");
        assert_eq!(json["signals"]["pivot_mode"], serde_json::Value::Null);
    }

    #[test]
    fn trail_event_defaults_missing_version() {
        let json = r#"{
            "ts": "2026-02-08T12:00:00Z",
            "ses": "rca-a3f8b2c1",
            "event": {
                "kind": "finalized",
                "session_id": "rca-a3f8b2c1",
                "factors": 2,
                "used_fallback": false,
                "signals": {
                    "answer_type": null,
                    "pivot_mode": null,
                    "depth_score": 3,
                    "unknown_count": 0,
                    "unknown_streak": 0,
                    "evidence_pivots": 0,
                    "dedup_retries_total": 1,
                    "dedup_duplicates_accepted": 0
                }
            }
        }"#;
        let parsed: TrailEvent = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.v, 1);
        assert_eq!(parsed.event.kind(), "finalized");
        assert_eq!(parsed.event.signals().depth_score, 3);
    }
}

//! CLI response types returned as JSON by `whys` commands.
//!
//! These structs define the shape of JSON output for `whys start`,
//! `whys answer`, `whys next`, `whys complete`, `whys show`, and `whys list`.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{AnswerRecord, Question, RootCauseResult, SessionSnapshot};
use crate::enums::SessionStatus;

/// Response from `whys start`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StartResponse {
    pub session: SessionSnapshot,
    pub question: Question,
}

/// Response from `whys answer`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AnswerResponse {
    pub session: SessionSnapshot,
    pub answer: AnswerRecord,
}

/// Response from `whys next`: either the next question or the final result.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NextResponse {
    Question {
        session: SessionSnapshot,
        question: Question,
    },
    RootCause {
        session: SessionSnapshot,
        root_cause: RootCauseResult,
    },
}

/// Response from `whys complete`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CompleteResponse {
    pub session: SessionSnapshot,
    pub root_cause: RootCauseResult,
}

/// One row of `whys list`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SessionListing {
    pub id: String,
    pub problem: String,
    pub status: SessionStatus,
    pub step: usize,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub expired: bool,
}

/// Structured error body printed by the CLI on failure.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub classification: crate::enums::ErrorClass,
}

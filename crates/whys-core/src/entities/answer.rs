use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::AnswerType;

/// One submitted answer, classified once at submission and immutable after.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AnswerRecord {
    /// Trimmed answer text, never empty.
    pub text: String,
    pub answer_type: AnswerType,
    /// 0-based position in the transcript.
    pub step_index: usize,
    pub created_at: DateTime<Utc>,
}

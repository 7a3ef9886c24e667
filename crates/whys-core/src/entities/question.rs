use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::PivotMode;

/// A generated "why" question.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub text: String,
    /// 1-based position in the interrogation.
    pub index: usize,
    /// Steering mode the question was generated under.
    pub pivot: PivotMode,
    /// Generation attempts spent on this question (1 when the first draft was accepted).
    pub attempts: u32,
    pub created_at: DateTime<Utc>,
}

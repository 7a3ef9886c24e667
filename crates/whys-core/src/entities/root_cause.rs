use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Final synthesized outcome of a completed interrogation.
///
/// `summary` is never empty. `contributing_factors` holds at most six
/// case-insensitively distinct entries, none restating the summary; an empty
/// list means no factor survived validation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RootCauseResult {
    pub summary: String,
    #[serde(default)]
    pub contributing_factors: Vec<String>,
}

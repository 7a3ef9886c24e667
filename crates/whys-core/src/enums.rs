//! Classification, steering, and status enums for Whys.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `SessionStatus` provides `allowed_next_states()` to enforce valid
//! transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// AnswerType
// ---------------------------------------------------------------------------

/// Label assigned to a single answer by the answer classifier.
///
/// Mutually exclusive and total: every answer maps to exactly one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnswerType {
    /// Inability to answer ("I don't know", "not sure", ...).
    Unknown,
    /// Generic qualitative restatement with no named component or mechanism.
    Vague,
    /// Names a concrete component, resource, process, or measurable quantity.
    Mechanism,
    /// States a condition, setting, or timing without asserting causation.
    Context,
}

impl AnswerType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Vague => "vague",
            Self::Mechanism => "mechanism",
            Self::Context => "context",
        }
    }
}

impl fmt::Display for AnswerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PivotMode
// ---------------------------------------------------------------------------

/// Steering directive for the next generated question.
///
/// Changes the *kind* of question requested (evidence-seeking vs. causal),
/// never its wording.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum PivotMode {
    /// Continue the standard causal drill-down.
    #[default]
    None,
    /// Ask for a concrete component, process, or metric.
    Observable,
    /// Ask for a reproducible pattern rather than a cause.
    Reproduction,
    /// Ask for measurable, observable data.
    Metric,
}

impl PivotMode {
    /// Whether this mode steers away from the plain causal question.
    #[must_use]
    pub const fn is_pivot(self) -> bool {
        !matches!(self, Self::None)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Observable => "observable",
            Self::Reproduction => "reproduction",
            Self::Metric => "metric",
        }
    }
}

impl fmt::Display for PivotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// Status of a causal interrogation session.
///
/// ```text
/// active → completed
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Active,
    Completed,
}

impl SessionStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Active => &[Self::Completed],
            Self::Completed => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ErrorClass
// ---------------------------------------------------------------------------

/// Caller-facing classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    NotFound,
    Expired,
    InvalidStep,
    InvalidInput,
    UpstreamError,
    InternalError,
}

impl ErrorClass {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Expired => "expired",
            Self::InvalidStep => "invalid_step",
            Self::InvalidInput => "invalid_input",
            Self::UpstreamError => "upstream_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_status_is_one_way() {
        assert!(SessionStatus::Active.can_transition_to(SessionStatus::Completed));
        assert!(!SessionStatus::Completed.can_transition_to(SessionStatus::Active));
        assert!(SessionStatus::Completed.allowed_next_states().is_empty());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&PivotMode::Reproduction).unwrap();
        assert_eq!(json, "\"reproduction\"");
        let parsed: AnswerType = serde_json::from_str("\"mechanism\"").unwrap();
        assert_eq!(parsed, AnswerType::Mechanism);
        assert_eq!(ErrorClass::UpstreamError.to_string(), "upstream_error");
    }

    #[test]
    fn only_none_is_not_a_pivot() {
        assert!(!PivotMode::None.is_pivot());
        assert!(PivotMode::Observable.is_pivot());
        assert!(PivotMode::Reproduction.is_pivot());
        assert!(PivotMode::Metric.is_pivot());
    }
}

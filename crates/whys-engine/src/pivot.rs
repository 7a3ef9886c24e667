//! Steering decision for the next question.
//!
//! Rules are checked in order and the first match wins:
//!
//! 1. last two answers `Unknown` → `Reproduction`
//! 2. at least three `Unknown` answers and depth below 2 → `Metric`
//! 3. latest answer `Unknown` → `Observable`
//! 4. latest answer `Vague` → `Observable`
//! 5. otherwise → `None`

use whys_core::entities::CausalSession;
use whys_core::enums::{AnswerType, PivotMode};

use crate::depth::compute_depth;

/// `Unknown` answers needed before rule 2 applies.
pub const METRIC_UNKNOWN_THRESHOLD: usize = 3;

/// Depth below which rule 2 applies.
pub const METRIC_DEPTH_CEILING: u32 = 2;

/// Select the pivot for a classification history (oldest first) and its depth.
#[must_use]
pub fn select(history: &[AnswerType], depth: u32) -> PivotMode {
    let Some(&latest) = history.last() else {
        return PivotMode::None;
    };

    if let [.., AnswerType::Unknown, AnswerType::Unknown] = history {
        return PivotMode::Reproduction;
    }

    let unknowns = history.iter().filter(|t| **t == AnswerType::Unknown).count();
    if unknowns >= METRIC_UNKNOWN_THRESHOLD && depth < METRIC_DEPTH_CEILING {
        return PivotMode::Metric;
    }

    match latest {
        AnswerType::Unknown | AnswerType::Vague => PivotMode::Observable,
        AnswerType::Mechanism | AnswerType::Context => PivotMode::None,
    }
}

/// Select the pivot for the question following a session's latest answer.
#[must_use]
pub fn select_pivot(session: &CausalSession) -> PivotMode {
    let history: Vec<AnswerType> = session.answer_types().collect();
    select(&history, compute_depth(session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::depth_of;
    use AnswerType::{Context, Mechanism, Unknown, Vague};

    fn select_for(history: &[AnswerType]) -> PivotMode {
        select(history, depth_of(history.iter().copied()))
    }

    #[test]
    fn empty_history_is_none() {
        assert_eq!(select_for(&[]), PivotMode::None);
    }

    #[test]
    fn two_unknowns_reproduce_regardless_of_history() {
        for prefix in [
            vec![],
            vec![Mechanism, Mechanism, Mechanism],
            vec![Vague, Context],
            vec![Unknown, Unknown],
        ] {
            let mut history = prefix.clone();
            history.extend([Unknown, Unknown]);
            assert_eq!(select_for(&history), PivotMode::Reproduction, "{prefix:?}");
        }
    }

    #[test]
    fn single_unknown_or_vague_is_observable() {
        assert_eq!(select_for(&[Unknown]), PivotMode::Observable);
        assert_eq!(select_for(&[Mechanism, Vague]), PivotMode::Observable);
    }

    #[test]
    fn mechanism_and_context_continue() {
        assert_eq!(select_for(&[Unknown, Mechanism]), PivotMode::None);
        assert_eq!(select_for(&[Vague, Context]), PivotMode::None);
    }

    #[test]
    fn metric_is_checked_before_observable() {
        // Three unknowns, depth 1; latest Unknown would be Observable under rule 3.
        let latest_unknown = [Unknown, Mechanism, Unknown, Vague, Unknown];
        assert_eq!(depth_of(latest_unknown), 1);
        assert_eq!(select_for(&latest_unknown), PivotMode::Metric);

        // Same counts, latest Vague would be Observable under rule 4.
        let latest_vague = [Unknown, Mechanism, Unknown, Unknown, Vague];
        assert_eq!(select_for(&latest_vague), PivotMode::Metric);
    }

    #[test]
    fn metric_needs_shallow_depth() {
        let deep = [Unknown, Mechanism, Unknown, Mechanism, Unknown];
        assert_eq!(select_for(&deep), PivotMode::Observable);
    }
}

//! Causal depth: how many answers named a concrete mechanism.

use whys_core::entities::CausalSession;
use whys_core::enums::AnswerType;

/// Count of `Mechanism` labels, independent of where the others fall.
#[must_use]
pub fn depth_of<I>(types: I) -> u32
where
    I: IntoIterator<Item = AnswerType>,
{
    let count = types
        .into_iter()
        .filter(|t| *t == AnswerType::Mechanism)
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Depth of a session, recomputed from its transcript.
#[must_use]
pub fn compute_depth(session: &CausalSession) -> u32 {
    depth_of(session.answer_types())
}

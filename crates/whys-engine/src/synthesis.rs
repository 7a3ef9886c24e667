//! Root-cause synthesis: request, parse, validate, repair.
//!
//! A summary is always produced. When the generator's summary is empty,
//! unparseable, or just repeats the last answer, a deterministic fallback is
//! built from the problem statement and the most recent mechanism answer.

use serde_json::Value;
use whys_core::entities::{CausalSession, RootCauseResult};
use whys_core::enums::AnswerType;

use crate::classify::{has_mechanism_indicator, normalize};
use crate::depth::compute_depth;
use crate::error::GenerationError;
use crate::generator::{GenerationRequest, Generator};
use crate::prompts;
use crate::similarity::SimilarityGate;

/// Upper bound on kept contributing factors.
pub const MAX_FACTORS: usize = 6;

/// Leading words that make a factor a recommendation rather than a cause.
const RECOMMENDATION_LEADS: &[&str] = &[
    "should", "must", "consider", "implement", "add", "improve", "ensure", "increase",
    "decrease", "reduce", "introduce", "adopt", "recommend", "optimize", "optimise", "fix",
    "monitor", "use", "upgrade", "migrate", "review",
];

/// Words ignored when checking whether a factor only restates the problem.
const FILLER: &[&str] = &[
    "a", "an", "the", "in", "on", "of", "at", "to", "for", "is", "was", "were", "are", "and",
    "or", "with", "by", "it", "its", "this", "that", "during",
];

/// Generator reply after lenient parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedReply {
    /// `None` when the reply looked structured but could not be parsed.
    pub summary: Option<String>,
    pub factors: Vec<String>,
}

/// Outcome of [`synthesize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    pub result: RootCauseResult,
    /// Whether the summary came from the deterministic fallback.
    pub used_fallback: bool,
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn strip_summary_label(text: &str) -> &str {
    let lower = text.to_ascii_lowercase();
    if lower.starts_with("summary:") {
        text["summary:".len()..].trim_start()
    } else {
        text
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Parse a root-cause reply.
///
/// Accepts a JSON object with `summary` and `contributing_factors`, wrapped in
/// code fences or prefixed with a `Summary:` label. A JSON string or plain
/// prose becomes the summary. Text that starts like JSON but fails to parse
/// yields `summary: None`.
#[must_use]
pub fn parse_reply(raw: &str) -> ParsedReply {
    let text = strip_summary_label(strip_code_fence(raw.trim()));
    if text.is_empty() {
        return ParsedReply {
            summary: Some(String::new()),
            factors: Vec::new(),
        };
    }

    let looks_structured = text.starts_with('{') || text.starts_with('[') || text.starts_with('"');
    if !looks_structured {
        return ParsedReply {
            summary: Some(text.to_string()),
            factors: Vec::new(),
        };
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => {
            let summary = map
                .get("summary")
                .and_then(value_to_text)
                .unwrap_or_default();
            let factors = match map.get("contributing_factors") {
                Some(Value::Array(items)) => items.iter().filter_map(value_to_text).collect(),
                Some(other) => value_to_text(other).into_iter().collect(),
                None => Vec::new(),
            };
            ParsedReply {
                summary: Some(summary),
                factors,
            }
        }
        Ok(Value::String(s)) => ParsedReply {
            summary: Some(s),
            factors: Vec::new(),
        },
        Ok(_) | Err(_) => ParsedReply::default(),
    }
}

/// Deterministic summary used when the generator's is unusable.
#[must_use]
pub fn fallback_summary(session: &CausalSession) -> String {
    let problem = session.problem.trim_end_matches(['.', '!', '?']);
    let mechanism = session
        .answers
        .iter()
        .rev()
        .find(|a| a.answer_type == AnswerType::Mechanism);
    match mechanism {
        Some(answer) => format!(
            "{problem} traces back to this mechanism: {}",
            answer.text.trim_end_matches(['.', '!', '?'])
        ),
        None => format!(
            "{problem}: no concrete mechanism was identified in the answers given"
        ),
    }
}

fn is_recommendation(normalized: &str) -> bool {
    let first = normalized.split(' ').next().unwrap_or_default();
    RECOMMENDATION_LEADS.contains(&first)
        || normalized.split(' ').any(|t| t == "should")
        || normalized.contains("need to")
        || normalized.contains("needs to")
}

fn restates_problem(normalized: &str, problem: &str, gate: &SimilarityGate) -> bool {
    let problem_norm = normalize(problem);
    if gate.is_duplicate(normalized, &problem_norm) {
        return true;
    }
    let problem_tokens: Vec<&str> = problem_norm.split(' ').collect();
    let mut content = normalized
        .split(' ')
        .filter(|t| !FILLER.contains(t))
        .peekable();
    content.peek().is_some() && content.all(|t| problem_tokens.contains(&t))
}

/// Whether a factor is too vague to keep.
#[must_use]
pub fn is_vague_factor(factor: &str, problem: &str, gate: &SimilarityGate) -> bool {
    let normalized = normalize(factor);
    normalized.is_empty()
        || is_recommendation(&normalized)
        || restates_problem(&normalized, problem, gate)
        || !has_mechanism_indicator(factor)
}

/// Trim, dedupe, and filter factors against the summary and the problem.
#[must_use]
pub fn filter_factors(
    factors: Vec<String>,
    summary: &str,
    problem: &str,
    gate: &SimilarityGate,
) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    for factor in factors {
        let factor = factor.trim();
        if factor.is_empty() {
            continue;
        }
        let folded = factor.to_lowercase();
        if seen.contains(&folded) {
            continue;
        }
        seen.push(folded);
        if gate.is_duplicate(factor, summary) || is_vague_factor(factor, problem, gate) {
            tracing::debug!(factor, "synthesis: factor dropped");
            continue;
        }
        kept.push(factor.to_string());
        if kept.len() == MAX_FACTORS {
            break;
        }
    }
    kept
}

/// Build a validated result from a raw reply.
#[must_use]
pub fn repair(raw: &str, session: &CausalSession, gate: &SimilarityGate) -> Synthesis {
    let parsed = parse_reply(raw);
    let last_answer = session.latest_answer().map(|a| normalize(&a.text));

    let candidate = parsed
        .summary
        .map(|s| s.trim().to_string())
        .filter(|s| !normalize(s).is_empty())
        .filter(|s| last_answer.as_deref() != Some(normalize(s).as_str()));

    let (summary, used_fallback) = match candidate {
        Some(summary) => (summary, false),
        None => (fallback_summary(session), true),
    };
    let contributing_factors = filter_factors(parsed.factors, &summary, &session.problem, gate);

    Synthesis {
        result: RootCauseResult {
            summary,
            contributing_factors,
        },
        used_fallback,
    }
}

/// Ask the generator for a root cause and validate what comes back.
///
/// # Errors
///
/// Propagates generator failures. Bad content never fails; it is repaired.
pub async fn synthesize<G: Generator>(
    generator: &G,
    session: &CausalSession,
    gate: &SimilarityGate,
) -> Result<Synthesis, GenerationError> {
    let depth = compute_depth(session);
    tracing::info!(session = %session.id, depth_score = depth, "synthesis: requesting root cause");

    let request = GenerationRequest::root_cause(prompts::root_cause(session));
    let raw = generator.generate(&request).await?;
    let synthesis = repair(&raw, session, gate);

    if synthesis.used_fallback {
        tracing::warn!(session = %session.id, "synthesis: generator summary unusable, using fallback");
    }
    tracing::info!(
        session = %session.id,
        depth_score = depth,
        factors = synthesis.result.contributing_factors.len(),
        "synthesis: root cause ready"
    );
    Ok(synthesis)
}

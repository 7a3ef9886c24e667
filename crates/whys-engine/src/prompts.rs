//! Prompt builders for question generation and root-cause synthesis.

use std::fmt::Write as _;

use whys_core::MAX_STEPS;
use whys_core::entities::CausalSession;
use whys_core::enums::PivotMode;

/// Shared style rules appended to every question prompt.
pub const STYLE_GUIDANCE: &str = "\
You facilitate a five-step \"why\" root cause interrogation.
- Ask exactly one question. Start it with an interrogative such as \"Why\", \"What caused\" or \"How did\".
- Never answer the question yourself and never propose fixes.
- Do not reuse the wording of earlier questions.
- Stay on the immediate cause of the latest answer.
- Keep the question under 160 characters.
- Reply with the question as plain text: no numbering, quotes, JSON, markup or tool calls.";

/// Directive paragraph for a pivot mode; `None` for the plain causal question.
#[must_use]
pub const fn pivot_directive(mode: PivotMode) -> Option<&'static str> {
    match mode {
        PivotMode::None => None,
        PivotMode::Observable => Some(
            "Steering: the last answer named no concrete component. Ask which specific \
             component, process, or metric was observed to misbehave.",
        ),
        PivotMode::Reproduction => Some(
            "Steering: the respondent could not explain the cause twice in a row. Ask for \
             a reproducible pattern instead: when, where, or under which conditions the \
             problem reliably appears.",
        ),
        PivotMode::Metric => Some(
            "Steering: the chain has produced little concrete evidence. Ask for measurable \
             data (a number, a graph, a log line, an error rate) that shows what happened.",
        ),
    }
}

fn history(session: &CausalSession) -> String {
    let mut out = String::new();
    for (question, answer) in session.transcript() {
        let _ = writeln!(
            out,
            "Step {}: Q: {}\nA: {}\n",
            question.index, question.text, answer.text
        );
    }
    if out.is_empty() {
        out.push_str("(no previous steps)\n");
    }
    out
}

/// Prompt for the first question of a session.
#[must_use]
pub fn initial_question(problem: &str) -> String {
    format!(
        "Problem statement:\n{problem}\n\n\
         Task: ask the first \"why\" question. Identify the most immediate observable \
         effect in the problem and ask what directly caused it. The question must not be \
         answerable with yes or no.\n\n{STYLE_GUIDANCE}"
    )
}

/// Prompt for the question following the session's latest answer.
#[must_use]
pub fn follow_up_question(session: &CausalSession, pivot: PivotMode) -> String {
    let last_answer = session
        .latest_answer()
        .map_or("(none)", |a| a.text.as_str());
    let step = session.questions.len() + 1;
    let mut prompt = format!(
        "Problem statement:\n{}\n\nPrior steps:\n{}\nLast answer: {last_answer}\n\n\
         Task: ask \"why\" question {step} of {MAX_STEPS}, going one layer deeper than the \
         last answer. Target the smallest cause inside it that has not been questioned yet.",
        session.problem,
        history(session),
    );
    if let Some(directive) = pivot_directive(pivot) {
        prompt.push_str("\n\n");
        prompt.push_str(directive);
    }
    prompt.push_str("\n\n");
    prompt.push_str(STYLE_GUIDANCE);
    prompt
}

/// Directive appended when a generated question repeated an earlier one.
#[must_use]
pub fn penalty(duplicate_of: &str, similarity: f64) -> String {
    format!(
        "Penalty: the previous attempt duplicated an earlier question \
         (similarity {similarity:.2}). Ask a deeper, non-redundant question about a more \
         specific underlying mechanism. Do not rephrase: \"{duplicate_of}\""
    )
}

/// Prompt for the final root-cause analysis.
#[must_use]
pub fn root_cause(session: &CausalSession) -> String {
    format!(
        "Problem statement:\n{}\n\nFull history:\n{}\n\
         Task: trace the answers into one causal chain and name the deepest underlying \
         cause. It must be a cause, not a symptom or a fix.\n\n\
         Reply with ONLY a JSON object:\n\
         {{\"summary\": \"<one sentence root cause>\", \"contributing_factors\": [\"<factor>\", ...]}}\n\
         Rules:\n\
         - contributing_factors lists 2 to 6 distinct concrete causes that enabled or amplified the root cause.\n\
         - Do not repeat the summary in the factors and do not recommend solutions.\n\
         - Use only facts from the history. If nothing concrete is known, return an empty summary and an empty list.\n\
         - No other keys, prose, code fences or markup.",
        session.problem,
        history(session),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use whys_core::entities::Question;
    use whys_core::enums::AnswerType;

    fn answered_session() -> CausalSession {
        let now = Utc::now();
        let mut s = CausalSession::new("rca-1".into(), "Checkout is slow", now).unwrap();
        s.push_question(
            Question {
                id: "qst-1".into(),
                text: "Why is checkout slow?".into(),
                index: 1,
                pivot: PivotMode::None,
                attempts: 1,
                created_at: now,
            },
            now,
        )
        .unwrap();
        s.record_answer("The payment API times out", AnswerType::Mechanism, now)
            .unwrap();
        s
    }

    #[test]
    fn follow_up_includes_history_and_directive() {
        let s = answered_session();
        let prompt = follow_up_question(&s, PivotMode::Metric);
        assert!(prompt.contains("Why is checkout slow?"));
        assert!(prompt.contains("Last answer: The payment API times out"));
        assert!(prompt.contains(pivot_directive(PivotMode::Metric).unwrap()));

        let plain = follow_up_question(&s, PivotMode::None);
        assert!(!plain.contains("Steering:"));
    }

    #[test]
    fn only_pivots_have_directives() {
        assert!(pivot_directive(PivotMode::None).is_none());
        assert!(pivot_directive(PivotMode::Reproduction).is_some());
    }

    #[test]
    fn penalty_names_duplicate() {
        let p = penalty("Why is checkout slow?", 0.912);
        assert!(p.contains("0.91"));
        assert!(p.contains("Why is checkout slow?"));
    }
}

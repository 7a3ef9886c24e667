use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::MAX_STEPS;
use crate::entities::{AnswerRecord, Question, RootCauseResult};
use crate::enums::{AnswerType, PivotMode, SessionStatus};
use crate::errors::CoreError;

/// A five-step causal interrogation over one problem statement.
///
/// The step counter is the number of recorded answers, so
/// `step() == transcript().count()` always holds. Questions lead answers by
/// at most one: a question is *pending* while it has no answer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CausalSession {
    pub id: String,
    pub problem: String,
    pub questions: Vec<Question>,
    pub answers: Vec<AnswerRecord>,
    pub status: SessionStatus,
    /// Consecutive `Unknown` answers ending at the latest answer.
    #[serde(default)]
    pub unknown_streak: u32,
    /// Non-`None` pivot selections made for this session.
    #[serde(default)]
    pub evidence_pivots: u32,
    pub root_cause: Option<RootCauseResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl CausalSession {
    /// Create an empty, active session.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the problem statement is blank.
    pub fn new(id: String, problem: &str, now: DateTime<Utc>) -> Result<Self, CoreError> {
        let problem = problem.trim();
        if problem.is_empty() {
            return Err(CoreError::Validation(
                "problem statement must not be empty".into(),
            ));
        }
        Ok(Self {
            id,
            problem: problem.to_string(),
            questions: Vec::new(),
            answers: Vec::new(),
            status: SessionStatus::Active,
            unknown_streak: 0,
            evidence_pivots: 0,
            root_cause: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        })
    }

    /// Number of recorded answers.
    #[must_use]
    pub fn step(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// Whether enough answers exist to synthesize a root cause.
    #[must_use]
    pub fn is_ready_to_finalize(&self) -> bool {
        self.step() >= MAX_STEPS
    }

    /// The question awaiting an answer, if any.
    #[must_use]
    pub fn pending_question(&self) -> Option<&Question> {
        if self.questions.len() > self.answers.len() {
            self.questions.last()
        } else {
            None
        }
    }

    /// Whether the latest answer is recorded and no follow-up question has
    /// been issued for it yet.
    #[must_use]
    pub fn has_unconsumed_answer(&self) -> bool {
        !self.answers.is_empty() && self.questions.len() == self.answers.len()
    }

    #[must_use]
    pub fn latest_answer(&self) -> Option<&AnswerRecord> {
        self.answers.last()
    }

    /// Ordered (question, answer) pairs.
    pub fn transcript(&self) -> impl Iterator<Item = (&Question, &AnswerRecord)> {
        self.questions.iter().zip(self.answers.iter())
    }

    /// Answer classifications in transcript order.
    pub fn answer_types(&self) -> impl DoubleEndedIterator<Item = AnswerType> + '_ {
        self.answers.iter().map(|a| a.answer_type)
    }

    /// Append a newly generated question.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidStep` if the session is completed, a
    /// question is already pending, or all questions have been asked.
    pub fn push_question(&mut self, question: Question, now: DateTime<Utc>) -> Result<(), CoreError> {
        self.ensure_active("add a question to")?;
        if self.pending_question().is_some() {
            return Err(CoreError::InvalidStep(
                "previous question has not been answered".into(),
            ));
        }
        if self.questions.len() >= MAX_STEPS {
            return Err(CoreError::InvalidStep(format!(
                "cannot ask more than {MAX_STEPS} questions"
            )));
        }
        self.questions.push(question);
        self.updated_at = now;
        Ok(())
    }

    /// Record an answer to the pending question.
    ///
    /// Updates `unknown_streak`: incremented on `Unknown`, reset otherwise.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidStep` if the session is completed or no
    /// question is pending, and `CoreError::Validation` for blank text.
    pub fn record_answer(
        &mut self,
        text: &str,
        answer_type: AnswerType,
        now: DateTime<Utc>,
    ) -> Result<&AnswerRecord, CoreError> {
        self.ensure_active("answer")?;
        if self.pending_question().is_none() {
            return Err(CoreError::InvalidStep(
                "no pending question to answer".into(),
            ));
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(CoreError::Validation("answer must not be empty".into()));
        }

        self.unknown_streak = if answer_type == AnswerType::Unknown {
            self.unknown_streak + 1
        } else {
            0
        };
        self.answers.push(AnswerRecord {
            text: text.to_string(),
            answer_type,
            step_index: self.answers.len(),
            created_at: now,
        });
        self.updated_at = now;
        Ok(&self.answers[self.answers.len() - 1])
    }

    /// Count a pivot selection against this session.
    pub const fn note_pivot(&mut self, mode: PivotMode) {
        if mode.is_pivot() {
            self.evidence_pivots += 1;
        }
    }

    /// Store the synthesized result and move to `Completed`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if already completed and
    /// `CoreError::InvalidStep` before all answers are recorded.
    pub fn complete(&mut self, result: RootCauseResult, now: DateTime<Utc>) -> Result<(), CoreError> {
        if !self.status.can_transition_to(SessionStatus::Completed) {
            return Err(CoreError::InvalidTransition {
                id: self.id.clone(),
                from: self.status.to_string(),
                to: SessionStatus::Completed.to_string(),
            });
        }
        if !self.is_ready_to_finalize() {
            return Err(CoreError::InvalidStep(format!(
                "cannot finalize before {MAX_STEPS} answers ({} recorded)",
                self.step()
            )));
        }
        self.status = SessionStatus::Completed;
        self.root_cause = Some(result);
        self.completed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    fn ensure_active(&self, action: &str) -> Result<(), CoreError> {
        if self.is_completed() {
            return Err(CoreError::InvalidStep(format!(
                "cannot {action} completed session {}",
                self.id
            )));
        }
        Ok(())
    }
}

/// Counts and status of a session, as returned by `whys show`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub problem: String,
    pub step: usize,
    pub status: SessionStatus,
    pub question_count: usize,
    pub answer_count: usize,
    pub depth_score: u32,
    pub unknown_streak: u32,
    pub evidence_pivots: u32,
}

impl SessionSnapshot {
    /// Build a snapshot; `depth_score` is computed by the caller.
    #[must_use]
    pub fn of(session: &CausalSession, depth_score: u32) -> Self {
        Self {
            session_id: session.id.clone(),
            problem: session.problem.clone(),
            step: session.step(),
            status: session.status,
            question_count: session.questions.len(),
            answer_count: session.answers.len(),
            depth_score,
            unknown_streak: session.unknown_streak,
            evidence_pivots: session.evidence_pivots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(index: usize) -> Question {
        Question {
            id: format!("qst-0000000{index}"),
            text: format!("Why {index}?"),
            index,
            pivot: PivotMode::None,
            attempts: 1,
            created_at: Utc::now(),
        }
    }

    fn session() -> CausalSession {
        CausalSession::new("rca-00000001".into(), "  Checkout is slow  ", Utc::now()).unwrap()
    }

    #[test]
    fn new_trims_problem_and_rejects_blank() {
        assert_eq!(session().problem, "Checkout is slow");
        let err = CausalSession::new("rca-1".into(), "   ", Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn answer_requires_pending_question() {
        let mut s = session();
        let err = s.record_answer("anything", AnswerType::Vague, Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidStep(_)));

        s.push_question(question(1), Utc::now()).unwrap();
        s.record_answer("the cache", AnswerType::Mechanism, Utc::now()).unwrap();
        assert_eq!(s.step(), 1);
        assert!(s.has_unconsumed_answer());

        let err = s.record_answer("again", AnswerType::Vague, Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidStep(_)));
    }

    #[test]
    fn question_cannot_be_pushed_while_pending() {
        let mut s = session();
        s.push_question(question(1), Utc::now()).unwrap();
        let err = s.push_question(question(2), Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidStep(_)));
    }

    #[test]
    fn blank_answer_is_rejected_without_state_change() {
        let mut s = session();
        s.push_question(question(1), Utc::now()).unwrap();
        let err = s.record_answer("  ", AnswerType::Unknown, Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(s.step(), 0);
        assert_eq!(s.unknown_streak, 0);
    }

    #[test]
    fn unknown_streak_resets_on_other_types() {
        let mut s = session();
        for (i, t) in [AnswerType::Unknown, AnswerType::Unknown, AnswerType::Context]
            .into_iter()
            .enumerate()
        {
            s.push_question(question(i + 1), Utc::now()).unwrap();
            s.record_answer("x", t, Utc::now()).unwrap();
            if i == 1 {
                assert_eq!(s.unknown_streak, 2);
            }
        }
        assert_eq!(s.unknown_streak, 0);
    }

    #[test]
    fn complete_requires_five_answers_and_is_one_way() {
        let mut s = session();
        let result = RootCauseResult {
            summary: "Pool exhaustion".into(),
            contributing_factors: vec![],
        };
        let err = s.complete(result.clone(), Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidStep(_)));

        for i in 1..=MAX_STEPS {
            s.push_question(question(i), Utc::now()).unwrap();
            s.record_answer("the pool", AnswerType::Mechanism, Utc::now()).unwrap();
        }
        let err = s.push_question(question(6), Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidStep(_)));

        s.complete(result.clone(), Utc::now()).unwrap();
        assert!(s.is_completed());
        assert_eq!(s.transcript().count(), s.step());

        let err = s.complete(result, Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
    }
}

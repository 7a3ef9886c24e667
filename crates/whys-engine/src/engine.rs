//! The session state machine.
//!
//! Every operation loads the session once, computes, and saves once at the
//! end. A failed call therefore leaves the stored session untouched.

use std::sync::Arc;

use chrono::Utc;
use whys_core::MAX_STEPS;
use whys_core::entities::{CausalSession, Question, RootCauseResult, SessionSnapshot};
use whys_core::enums::{AnswerType, PivotMode};
use whys_core::events::{EngineEvent, Signals};
use whys_core::ids::{PREFIX_QUESTION, PREFIX_SESSION, generate_id};

use crate::classify::AnswerClassifier;
use crate::depth::compute_depth;
use crate::error::EngineError;
use crate::generator::{GenerationRequest, Generator};
use crate::guard::GenerationGuard;
use crate::metrics::EngineMetrics;
use crate::observe::{EventSink, TracingSink};
use crate::pivot::select_pivot;
use crate::prompts;
use crate::store::SessionStore;
use crate::synthesis::synthesize;

/// Result of [`CausalEngine::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Question(Question),
    RootCause(RootCauseResult),
}

/// Drives sessions through five questions and a final synthesis.
pub struct CausalEngine<G, S> {
    generator: G,
    store: S,
    metrics: Arc<EngineMetrics>,
    guard: GenerationGuard,
    sinks: Vec<Arc<dyn EventSink>>,
}

fn new_id(prefix: &str) -> Result<String, EngineError> {
    generate_id(prefix).map_err(|e| EngineError::Internal(format!("id generation failed: {e}")))
}

impl<G: Generator, S: SessionStore> CausalEngine<G, S> {
    /// Engine with fresh metrics, the default guard, and a [`TracingSink`].
    pub fn new(generator: G, store: S) -> Self {
        Self {
            generator,
            store,
            metrics: Arc::new(EngineMetrics::new()),
            guard: GenerationGuard::default(),
            sinks: vec![Arc::new(TracingSink)],
        }
    }

    /// Share counters with other engines or the caller.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<EngineMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    #[must_use]
    pub fn with_guard(mut self, guard: GenerationGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Add a sink; events go to every sink in insertion order.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub const fn metrics(&self) -> &Arc<EngineMetrics> {
        &self.metrics
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Create a session and ask its first question.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank problem, `Upstream` if generation fails,
    /// `Internal` on store faults. Nothing is stored on failure.
    pub async fn start(&self, problem: &str) -> Result<(CausalSession, Question), EngineError> {
        let now = Utc::now();
        let mut session = CausalSession::new(new_id(PREFIX_SESSION)?, problem, now)?;

        let request = GenerationRequest::question(
            prompts::initial_question(&session.problem),
            PivotMode::None,
        );
        let guarded = self
            .guard
            .obtain_question(&self.generator, &request, &[], &self.metrics)
            .await?;

        let question = Question {
            id: new_id(PREFIX_QUESTION)?,
            text: guarded.text,
            index: 1,
            pivot: PivotMode::None,
            attempts: guarded.attempts,
            created_at: now,
        };
        session.push_question(question.clone(), now)?;
        self.store.create(&session).await?;

        tracing::info!(session = %session.id, "engine: session started");
        self.emit(&EngineEvent::Steered {
            session_id: session.id.clone(),
            question_index: question.index,
            attempts: question.attempts,
            duplicate_accepted: guarded.duplicate_accepted,
            signals: self.signals(&session, None, Some(PivotMode::None)),
        });
        Ok((session, question))
    }

    /// Record an answer to the pending question.
    ///
    /// # Errors
    ///
    /// `InvalidStep` when the session is completed or has no pending
    /// question, `InvalidInput` for blank text, plus store errors.
    pub async fn submit_answer(&self, id: &str, text: &str) -> Result<CausalSession, EngineError> {
        let mut session = self.store.load(id).await?;
        let answer_type = AnswerClassifier::classify(text);
        let step = session
            .record_answer(text, answer_type, Utc::now())?
            .step_index
            + 1;
        self.store.save(&session).await?;

        if answer_type == AnswerType::Unknown {
            self.metrics.record_unknown();
        }
        tracing::info!(session = %session.id, step, answer_type = %answer_type, "engine: answer recorded");
        self.emit(&EngineEvent::Classified {
            session_id: session.id.clone(),
            step,
            signals: self.signals(&session, Some(answer_type), None),
        });
        Ok(session)
    }

    /// Issue the next question, or synthesize the root cause after the
    /// fifth answer. A completed session returns its stored result.
    ///
    /// # Errors
    ///
    /// `InvalidStep` while a question is still unanswered, `Upstream` if
    /// generation fails, plus store errors.
    pub async fn advance(&self, id: &str) -> Result<(CausalSession, Advance), EngineError> {
        let session = self.store.load(id).await?;
        if session.is_completed() {
            let result = Self::stored_result(&session)?;
            return Ok((session, Advance::RootCause(result)));
        }
        if !session.has_unconsumed_answer() {
            let detail = session.pending_question().map_or_else(
                || "no answer is waiting for a follow-up question".to_string(),
                |pending| format!("question {} has not been answered", pending.index),
            );
            return Err(EngineError::InvalidStep(detail));
        }
        if session.is_ready_to_finalize() {
            let (session, result) = self.complete(session).await?;
            return Ok((session, Advance::RootCause(result)));
        }
        let (session, question) = self.ask_next(session).await?;
        Ok((session, Advance::Question(question)))
    }

    /// Synthesize the root cause. Idempotent once completed.
    ///
    /// # Errors
    ///
    /// `InvalidStep` before five answers, `Upstream` if generation fails,
    /// plus store errors.
    pub async fn finalize(&self, id: &str) -> Result<(CausalSession, RootCauseResult), EngineError> {
        let session = self.store.load(id).await?;
        if session.is_completed() {
            let result = Self::stored_result(&session)?;
            return Ok((session, result));
        }
        if !session.is_ready_to_finalize() {
            return Err(EngineError::InvalidStep(format!(
                "cannot finalize before {MAX_STEPS} answers ({} recorded)",
                session.step()
            )));
        }
        self.complete(session).await
    }

    /// Counts and status for a session.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Expired`, or `Internal` from the store.
    pub async fn snapshot(&self, id: &str) -> Result<SessionSnapshot, EngineError> {
        let session = self.store.load(id).await?;
        Ok(SessionSnapshot::of(&session, compute_depth(&session)))
    }

    /// The full stored session.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Expired`, or `Internal` from the store.
    pub async fn session(&self, id: &str) -> Result<CausalSession, EngineError> {
        Ok(self.store.load(id).await?)
    }

    async fn ask_next(&self, mut session: CausalSession) -> Result<(CausalSession, Question), EngineError> {
        let pivot = select_pivot(&session);
        let request =
            GenerationRequest::question(prompts::follow_up_question(&session, pivot), pivot);
        let history: Vec<&str> = session.questions.iter().map(|q| q.text.as_str()).collect();
        let guarded = self
            .guard
            .obtain_question(&self.generator, &request, &history, &self.metrics)
            .await?;

        let now = Utc::now();
        let question = Question {
            id: new_id(PREFIX_QUESTION)?,
            text: guarded.text,
            index: session.questions.len() + 1,
            pivot,
            attempts: guarded.attempts,
            created_at: now,
        };
        session.push_question(question.clone(), now)?;
        session.note_pivot(pivot);
        self.store.save(&session).await?;

        if pivot.is_pivot() {
            self.metrics.record_pivot();
        }
        tracing::info!(
            session = %session.id,
            question = question.index,
            pivot = %pivot,
            attempts = question.attempts,
            "engine: question issued"
        );
        self.emit(&EngineEvent::Steered {
            session_id: session.id.clone(),
            question_index: question.index,
            attempts: question.attempts,
            duplicate_accepted: guarded.duplicate_accepted,
            signals: self.signals(
                &session,
                session.latest_answer().map(|a| a.answer_type),
                Some(pivot),
            ),
        });
        Ok((session, question))
    }

    async fn complete(
        &self,
        mut session: CausalSession,
    ) -> Result<(CausalSession, RootCauseResult), EngineError> {
        let synthesis = synthesize(&self.generator, &session, self.guard.gate()).await?;
        session.complete(synthesis.result.clone(), Utc::now())?;
        self.store.save(&session).await?;

        tracing::info!(
            session = %session.id,
            factors = synthesis.result.contributing_factors.len(),
            "engine: session completed"
        );
        self.emit(&EngineEvent::Finalized {
            session_id: session.id.clone(),
            factors: synthesis.result.contributing_factors.len(),
            used_fallback: synthesis.used_fallback,
            signals: self.signals(&session, None, None),
        });
        Ok((session, synthesis.result))
    }

    fn stored_result(session: &CausalSession) -> Result<RootCauseResult, EngineError> {
        session.root_cause.clone().ok_or_else(|| {
            EngineError::Internal(format!(
                "completed session {} has no root cause",
                session.id
            ))
        })
    }

    fn signals(
        &self,
        session: &CausalSession,
        answer_type: Option<AnswerType>,
        pivot_mode: Option<PivotMode>,
    ) -> Signals {
        let metrics = self.metrics.snapshot();
        Signals {
            answer_type,
            pivot_mode,
            depth_score: compute_depth(session),
            unknown_count: metrics.unknown_count,
            unknown_streak: session.unknown_streak,
            evidence_pivots: session.evidence_pivots,
            dedup_retries_total: metrics.dedup_retries_total,
            dedup_duplicates_accepted: metrics.dedup_duplicates_accepted,
        }
    }

    fn emit(&self, event: &EngineEvent) {
        for sink in &self.sinks {
            sink.record(event);
        }
    }
}

//! Duplicate-aware question generation.

use crate::error::GenerationError;
use crate::generator::{GenerationRequest, Generator};
use crate::metrics::EngineMetrics;
use crate::prompts;
use crate::similarity::SimilarityGate;

/// Total attempts per question, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// A question accepted by the guard.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardedQuestion {
    pub text: String,
    pub attempts: u32,
    /// True when every attempt duplicated an earlier question.
    pub duplicate_accepted: bool,
}

/// Retries generation while the result repeats an earlier question.
#[derive(Debug, Clone, Copy)]
pub struct GenerationGuard {
    gate: SimilarityGate,
    max_attempts: u32,
}

impl Default for GenerationGuard {
    fn default() -> Self {
        Self::new(SimilarityGate::default(), DEFAULT_MAX_ATTEMPTS)
    }
}

impl GenerationGuard {
    /// `max_attempts` below 1 is treated as 1.
    #[must_use]
    pub fn new(gate: SimilarityGate, max_attempts: u32) -> Self {
        Self {
            gate,
            max_attempts: max_attempts.max(1),
        }
    }

    #[must_use]
    pub const fn gate(&self) -> &SimilarityGate {
        &self.gate
    }

    /// Obtain a question that does not duplicate anything in `history`.
    ///
    /// Each retry carries a penalty naming the duplicated question and bumps
    /// `dedup_retries_total`. When the final attempt is still a duplicate it
    /// is accepted and `dedup_duplicates_accepted` is bumped.
    ///
    /// # Errors
    ///
    /// Propagates generator failures without retrying, and returns
    /// `GenerationError::Empty` when the generator produces blank text.
    pub async fn obtain_question<G: Generator>(
        &self,
        generator: &G,
        request: &GenerationRequest,
        history: &[&str],
        metrics: &EngineMetrics,
    ) -> Result<GuardedQuestion, GenerationError> {
        let mut current = request.clone();
        let mut attempts = 0;
        loop {
            attempts += 1;
            let text = generator.generate(&current).await?.trim().to_string();
            if text.is_empty() {
                return Err(GenerationError::Empty);
            }

            let Some(dup) = self.gate.duplicate_of(&text, history.iter().copied()) else {
                if attempts > 1 {
                    tracing::debug!(attempts, "guard: duplicate resolved by retry");
                }
                return Ok(GuardedQuestion {
                    text,
                    attempts,
                    duplicate_accepted: false,
                });
            };

            if attempts >= self.max_attempts {
                metrics.record_duplicate_accepted();
                tracing::warn!(
                    attempts,
                    similarity = dup.score,
                    previous = dup.text,
                    "guard: duplicate accepted after exhausting attempts"
                );
                return Ok(GuardedQuestion {
                    text,
                    attempts,
                    duplicate_accepted: true,
                });
            }

            metrics.record_retry();
            tracing::debug!(
                attempt = attempts,
                similarity = dup.score,
                "guard: generated question duplicates history, retrying"
            );
            current = request.with_penalty(prompts::penalty(dup.text, dup.score));
        }
    }
}

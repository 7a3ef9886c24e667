//! The text-generation capability consumed by the engine.

use std::future::Future;

use whys_core::enums::PivotMode;

use crate::error::GenerationError;

/// What a generation request is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPurpose {
    /// The next "why" question, as plain text.
    Question,
    /// The final analysis, as a JSON object.
    RootCause,
}

/// Everything a generator needs for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub purpose: GenerationPurpose,
    pub prompt: String,
    /// Steering applied to the prompt; `None` for root-cause requests.
    pub pivot: PivotMode,
    /// Dedup directive appended after a duplicate was produced.
    pub penalty: Option<String>,
}

impl GenerationRequest {
    #[must_use]
    pub const fn question(prompt: String, pivot: PivotMode) -> Self {
        Self {
            purpose: GenerationPurpose::Question,
            prompt,
            pivot,
            penalty: None,
        }
    }

    #[must_use]
    pub const fn root_cause(prompt: String) -> Self {
        Self {
            purpose: GenerationPurpose::RootCause,
            prompt,
            pivot: PivotMode::None,
            penalty: None,
        }
    }

    /// A copy of this request carrying `penalty`.
    #[must_use]
    pub fn with_penalty(&self, penalty: String) -> Self {
        Self {
            penalty: Some(penalty),
            ..self.clone()
        }
    }

    /// Prompt text to send, with the penalty appended when present.
    #[must_use]
    pub fn full_prompt(&self) -> String {
        match &self.penalty {
            Some(penalty) => format!("{}\n\n{penalty}", self.prompt),
            None => self.prompt.clone(),
        }
    }
}

/// Black-box text generation: context and steering in, text or failure out.
pub trait Generator: Send + Sync {
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn penalty_is_appended_to_prompt() {
        let base = GenerationRequest::question("Ask why.".into(), PivotMode::Observable);
        assert_eq!(base.full_prompt(), "Ask why.");

        let retry = base.with_penalty("Do not repeat.".into());
        assert_eq!(retry.full_prompt(), "Ask why.\n\nDo not repeat.");
        assert_eq!(retry.pivot, PivotMode::Observable);
        assert!(base.penalty.is_none());
    }
}

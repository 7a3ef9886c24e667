//! # whys-engine
//!
//! Deterministic core of the five-step causal interrogation.
//!
//! Each answer is classified ([`classify`]), the transcript's causal depth is
//! recomputed ([`depth`]), a steering mode is chosen ([`pivot`]), and the next
//! question is generated behind a duplicate guard ([`guard`]). After the fifth
//! answer a root cause is synthesized and validated ([`synthesis`]).
//!
//! Text generation and persistence are injected through the [`Generator`] and
//! [`SessionStore`] traits, so everything here is testable with scripted
//! collaborators.

pub mod classify;
pub mod depth;
pub mod engine;
pub mod error;
pub mod generator;
pub mod guard;
pub mod metrics;
pub mod observe;
pub mod pivot;
pub mod prompts;
pub mod similarity;
pub mod store;
pub mod synthesis;

pub use classify::AnswerClassifier;
pub use engine::{Advance, CausalEngine};
pub use error::{EngineError, GenerationError, StoreError};
pub use generator::{GenerationPurpose, GenerationRequest, Generator};
pub use guard::{GenerationGuard, GuardedQuestion};
pub use metrics::{EngineMetrics, MetricsSnapshot};
pub use observe::{EventSink, MemorySink, NoopSink, TracingSink};
pub use similarity::SimilarityGate;
pub use store::{MemoryStore, SessionStore};

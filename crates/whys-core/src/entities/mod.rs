//! Entity structs for the causal interrogation.

mod answer;
mod question;
mod root_cause;
mod session;

pub use answer::AnswerRecord;
pub use question::Question;
pub use root_cause::RootCauseResult;
pub use session::{CausalSession, SessionSnapshot};

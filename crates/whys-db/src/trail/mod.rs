//! JSONL event trail.
//!
//! Per-session files live in `.whys/trail/` and hold one [`TrailEvent`] per
//! line, in emission order.
//!
//! [`TrailEvent`]: whys_core::events::TrailEvent

pub mod writer;

pub use writer::TrailWriter;

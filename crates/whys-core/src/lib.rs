//! # whys-core
//!
//! Core types, ID generation, and error classification for Whys.
//!
//! This crate provides the foundational types shared across all Whys crates:
//! - Entity structs for the interrogation (questions, answers, sessions, root causes)
//! - Classification, pivot, and status enums with state machine transitions
//! - ID prefix constants and generation
//! - Cross-cutting error types and the caller-facing error classification
//! - Observability event envelope for the JSONL trail
//! - CLI response types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod events;
pub mod ids;
pub mod responses;

/// Number of answers an interrogation collects before synthesis.
pub const MAX_STEPS: usize = 5;

//! ID prefixes and generation.
//!
//! IDs are `{prefix}-{8 hex chars}`, e.g. `rca-a3f8b2c1`.

/// Prefix for interrogation sessions.
pub const PREFIX_SESSION: &str = "rca";

/// Prefix for generated questions.
pub const PREFIX_QUESTION: &str = "qst";

/// Generate a prefixed random ID from 4 bytes of OS entropy.
///
/// # Errors
///
/// Returns `getrandom::Error` if the OS entropy source is unavailable.
pub fn generate_id(prefix: &str) -> Result<String, getrandom::Error> {
    let mut bytes = [0u8; 4];
    getrandom::fill(&mut bytes)?;
    let suffix: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format!("{prefix}-{suffix}"))
}

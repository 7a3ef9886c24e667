//! Question-generation tuning.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_duplicate_threshold() -> f64 {
    0.85
}

const fn default_max_attempts() -> u32 {
    3
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Similarity at or above which a generated question counts as a repeat.
    #[serde(default = "default_duplicate_threshold")]
    pub duplicate_threshold: f64,

    /// Total generation attempts per question, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            duplicate_threshold: default_duplicate_threshold(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl EngineConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.duplicate_threshold) {
            return Err(ConfigError::invalid(
                "engine.duplicate_threshold",
                format!("{} is outside 0.0..=1.0", self.duplicate_threshold),
            ));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::invalid("engine.max_attempts", "must be >= 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = EngineConfig::default();
        assert!((config.duplicate_threshold - 0.85).abs() < f64::EPSILON);
        assert_eq!(config.max_attempts, 3);
        assert!(config.validate().is_ok());
    }
}

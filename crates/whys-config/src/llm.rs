//! Chat-completion provider configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "openai/gpt-oss-20b".to_string()
}

const fn default_temperature() -> f32 {
    0.3
}

const fn default_top_p() -> f32 {
    0.85
}

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// OpenAI-compatible API root (the client appends `/chat/completions`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token. Usually supplied via `WHYS_LLM__API_KEY`.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmConfig {
    /// Whether an API key is available.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("llm.base_url", "must not be empty"));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::invalid("llm.model", "must not be empty"));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ConfigError::invalid(
                "llm.temperature",
                format!("{} is outside 0.0..=1.0", self.temperature),
            ));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(ConfigError::invalid(
                "llm.top_p",
                format!("{} is outside 0.0..=1.0", self.top_p),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("llm.timeout_secs", "must be > 0"));
        }
        Ok(())
    }
}

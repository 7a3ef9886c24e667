//! Session persistence configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_ttl_secs() -> u64 {
    1800
}

fn default_db_file() -> String {
    "sessions.db".to_string()
}

const fn default_trail() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Session lifetime, in seconds, measured from creation.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Database file name, relative to the `.whys/` directory.
    #[serde(default = "default_db_file")]
    pub db_file: String,

    /// Whether to append events to `.whys/trail/{session}.jsonl`.
    #[serde(default = "default_trail")]
    pub trail: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            db_file: default_db_file(),
            trail: default_trail(),
        }
    }
}

impl StoreConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.ttl_secs == 0 {
            return Err(ConfigError::invalid("store.ttl_secs", "must be > 0"));
        }
        if self.db_file.trim().is_empty() {
            return Err(ConfigError::invalid("store.db_file", "must not be empty"));
        }
        Ok(())
    }
}

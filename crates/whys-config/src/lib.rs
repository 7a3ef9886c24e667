//! # whys-config
//!
//! Layered configuration loading for Whys using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`WHYS_*` prefix, `__` as separator)
//! 2. Project-level `.whys/config.toml`
//! 3. User-level `~/.config/whys/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `WHYS_LLM__API_KEY` -> `llm.api_key`, `WHYS_STORE__TTL_SECS` -> `store.ttl_secs`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use whys_config::WhysConfig;
//!
//! let config = WhysConfig::load_with_dotenv().expect("config");
//! config.validate().expect("valid config");
//!
//! if config.llm.is_configured() {
//!     println!("model: {}", config.llm.model);
//! }
//! ```

mod engine;
mod error;
mod general;
mod llm;
mod store;

pub use engine::EngineConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use llm::LlmConfig;
pub use store::StoreConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the project-local state directory.
pub const PROJECT_DIR: &str = ".whys";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WhysConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl WhysConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source fails to parse or extract.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration for a project rooted at `root`.
    ///
    /// Same chain as [`Self::load`], but the project layer is read from
    /// `{root}/.whys/config.toml` instead of the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source fails to parse or extract.
    pub fn load_for_project(root: &Path) -> Result<Self, ConfigError> {
        Self::figment_for(root).extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source fails to parse or extract.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain rooted at the current directory.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_for(Path::new("."))
    }

    /// Build the figment provider chain with the project layer under `root`.
    #[must_use]
    pub fn figment_for(root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = root.join(PROJECT_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("WHYS_").split("__"))
    }

    /// Check every section for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::InvalidValue` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.llm.validate()?;
        self.store.validate()?;
        self.engine.validate()?;
        self.general.validate()
    }

    /// Require a usable `[llm]` section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when no API key is set.
    pub fn require_llm(&self) -> Result<&LlmConfig, ConfigError> {
        if self.llm.is_configured() {
            Ok(&self.llm)
        } else {
            Err(ConfigError::NotConfigured {
                section: "llm".into(),
            })
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("whys").join("config.toml"))
    }
}

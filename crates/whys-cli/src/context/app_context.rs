use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::TimeDelta;
use whys_config::{PROJECT_DIR, WhysConfig};
use whys_db::WhysDb;
use whys_db::trail::TrailWriter;
use whys_engine::{
    CausalEngine, GenerationError, GenerationGuard, GenerationRequest, Generator, SessionStore,
    SimilarityGate,
};
use whys_llm::LlmClient;

/// The generator used by every command: the configured LLM, or a stand-in
/// that fails generation when no API key is set so read-only and answer
/// commands still work.
pub enum AppGenerator {
    Llm(LlmClient),
    Unconfigured,
}

impl AppGenerator {
    pub fn from_config(config: &WhysConfig) -> anyhow::Result<Self> {
        match config.require_llm() {
            Ok(llm) => Ok(Self::Llm(
                LlmClient::new(llm).context("failed to build LLM client")?,
            )),
            Err(_) => Ok(Self::Unconfigured),
        }
    }
}

impl Generator for AppGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        match self {
            Self::Llm(client) => client.generate(request).await,
            Self::Unconfigured => Err(GenerationError::Unavailable(
                "no LLM API key configured (set WHYS_LLM__API_KEY)".into(),
            )),
        }
    }
}

/// Engine wired with the `[engine]` settings.
pub fn build_engine<S: SessionStore>(
    config: &WhysConfig,
    store: S,
) -> anyhow::Result<CausalEngine<AppGenerator, S>> {
    let guard = GenerationGuard::new(
        SimilarityGate::new(config.engine.duplicate_threshold),
        config.engine.max_attempts,
    );
    Ok(CausalEngine::new(AppGenerator::from_config(config)?, store).with_guard(guard))
}

/// Session lifetime from `[store] ttl_secs`.
#[must_use]
pub fn session_ttl(config: &WhysConfig) -> TimeDelta {
    i64::try_from(config.store.ttl_secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}

/// Shared application resources initialized once per command.
pub struct AppContext {
    pub engine: CausalEngine<AppGenerator, WhysDb>,
    pub config: WhysConfig,
}

impl AppContext {
    /// Open `.whys/{db_file}` under `project_root` and attach the trail.
    pub async fn init(project_root: PathBuf, config: WhysConfig) -> anyhow::Result<Self> {
        let whys_dir = project_root.join(PROJECT_DIR);
        std::fs::create_dir_all(&whys_dir)
            .with_context(|| format!("failed to create {}", whys_dir.display()))?;

        let db_path = whys_dir.join(&config.store.db_file);
        let db = WhysDb::open_with_ttl(&db_path.to_string_lossy(), session_ttl(&config))
            .await
            .context("failed to open session database")?;

        let trail = trail_writer(&whys_dir, &config)?;
        let engine = build_engine(&config, db)?.with_sink(Arc::new(trail));

        Ok(Self { engine, config })
    }

    #[must_use]
    pub fn db(&self) -> &WhysDb {
        self.engine.store()
    }

    #[must_use]
    pub fn callback_url(&self) -> Option<&str> {
        self.config.general.callback()
    }
}

fn trail_writer(whys_dir: &Path, config: &WhysConfig) -> anyhow::Result<TrailWriter> {
    if config.store.trail {
        TrailWriter::new(whys_dir.join("trail")).context("failed to create trail directory")
    } else {
        Ok(TrailWriter::disabled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_follows_config() {
        let mut config = WhysConfig::default();
        assert_eq!(session_ttl(&config), TimeDelta::seconds(1800));
        config.store.ttl_secs = u64::MAX;
        assert_eq!(session_ttl(&config), TimeDelta::MAX);
    }

    #[tokio::test]
    async fn unconfigured_generator_is_unavailable() {
        let generator = AppGenerator::from_config(&WhysConfig::default()).unwrap();
        let err = generator
            .generate(&GenerationRequest::root_cause("Analyze.".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Unavailable(_)));
    }

    #[tokio::test]
    async fn init_creates_project_dir_and_trail() {
        let temp = tempfile::tempdir().unwrap();
        let ctx = AppContext::init(temp.path().to_path_buf(), WhysConfig::default())
            .await
            .unwrap();
        assert!(temp.path().join(".whys/sessions.db").exists());
        assert!(temp.path().join(".whys/trail").is_dir());
        assert!(ctx.db().list_sessions(10).await.unwrap().is_empty());
        assert!(ctx.callback_url().is_none());
    }
}

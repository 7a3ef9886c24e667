//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed files and env vars.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use whys_config::{ConfigError, WhysConfig};

#[test]
fn loads_llm_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[llm]
base_url = "http://localhost:8080/v1"
api_key = "gsk-test"
model = "llama-3.1-8b-instant"
temperature = 0.1
top_p = 0.9
timeout_secs = 5
"#,
        )?;

        let config: WhysConfig = Figment::from(Serialized::defaults(WhysConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.llm.base_url, "http://localhost:8080/v1");
        assert_eq!(config.llm.model, "llama-3.1-8b-instant");
        assert_eq!(config.llm.timeout_secs, 5);
        assert!(config.llm.is_configured());
        assert!(config.validate().is_ok());
        Ok(())
    });
}

#[test]
fn partial_sections_keep_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r"
[store]
ttl_secs = 60
",
        )?;

        let config: WhysConfig = Figment::from(Serialized::defaults(WhysConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.store.ttl_secs, 60);
        assert_eq!(config.store.db_file, "sessions.db");
        assert!(config.store.trail);
        assert_eq!(config.engine.max_attempts, 3);
        assert_eq!(config.llm.model, "openai/gpt-oss-20b");
        Ok(())
    });
}

#[test]
fn project_file_is_read_from_whys_dir() {
    Jail::expect_with(|jail| {
        jail.create_dir(".whys")?;
        jail.create_file(
            ".whys/config.toml",
            r#"
[engine]
duplicate_threshold = 0.9
max_attempts = 2

[general]
callback_url = "https://hooks.example.com/rca"
"#,
        )?;

        let config = WhysConfig::load_for_project(jail.directory()).expect("config loads");
        assert!((config.engine.duplicate_threshold - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.engine.max_attempts, 2);
        assert_eq!(
            config.general.callback(),
            Some("https://hooks.example.com/rca")
        );
        Ok(())
    });
}

#[test]
fn invalid_values_fail_validation() {
    Jail::expect_with(|jail| {
        jail.create_dir(".whys")?;
        jail.create_file(
            ".whys/config.toml",
            r"
[engine]
max_attempts = 0
",
        )?;

        let config = WhysConfig::load_for_project(jail.directory()).expect("config loads");
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref field, .. } if field == "engine.max_attempts"
        ));
        Ok(())
    });
}

#[test]
fn malformed_toml_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.create_dir(".whys")?;
        jail.create_file(".whys/config.toml", "[store\nttl_secs = ")?;

        let err = WhysConfig::load_for_project(jail.directory()).unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)));
        Ok(())
    });
}

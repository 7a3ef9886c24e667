use figment::Jail;
use whys_config::WhysConfig;

#[test]
fn env_sets_nested_fields() {
    Jail::expect_with(|jail| {
        jail.set_env("WHYS_LLM__API_KEY", "gsk-from-env");
        jail.set_env("WHYS_STORE__TTL_SECS", "90");

        let config = WhysConfig::load_for_project(jail.directory()).expect("config loads");
        assert_eq!(config.llm.api_key, "gsk-from-env");
        assert_eq!(config.store.ttl_secs, 90);
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".whys")?;
        jail.create_file(
            ".whys/config.toml",
            r#"
[llm]
model = "from-file"
"#,
        )?;
        jail.set_env("WHYS_LLM__MODEL", "from-env");

        let config = WhysConfig::load_for_project(jail.directory()).expect("config loads");
        assert_eq!(config.llm.model, "from-env");
        Ok(())
    });
}

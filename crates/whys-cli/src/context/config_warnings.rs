use whys_config::WhysConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &WhysConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &WhysConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let mut warnings = Vec::new();

    if !config.llm.is_configured() && has_single_underscore_key(&env_keys, "WHYS_LLM") {
        warnings.push(
            "LLM config appears default while WHYS_LLM* env vars exist. Use double underscores (example: WHYS_LLM__API_KEY)."
                .to_string(),
        );
    }

    if config.general.callback().is_none() && has_single_underscore_key(&env_keys, "WHYS_GENERAL") {
        warnings.push(
            "Callback URL is unset while WHYS_GENERAL* env vars exist. Use double underscores (example: WHYS_GENERAL__CALLBACK_URL)."
                .to_string(),
        );
    }

    if !config.llm.is_configured() {
        warnings.push(
            "No LLM API key configured; question generation will fail. Set WHYS_LLM__API_KEY or [llm] api_key."
                .to_string(),
        );
    }

    warnings
}

/// `WHYS_LLM_API_KEY` instead of `WHYS_LLM__API_KEY`.
fn has_single_underscore_key(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| {
        key.strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('_') && !rest.starts_with("__"))
    })
}

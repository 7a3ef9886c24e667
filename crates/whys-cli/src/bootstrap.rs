use std::path::Path;

use anyhow::Context;
use whys_config::WhysConfig;

/// Load `.env` from the project root (or the current directory), then the
/// layered config for that project.
pub fn load_config(project_root: &Path) -> anyhow::Result<WhysConfig> {
    load_project_dotenv(project_root)?;
    let config = WhysConfig::load_for_project(project_root)
        .context("failed to load whys configuration")?;
    config.validate().context("invalid whys configuration")?;
    Ok(config)
}

fn load_project_dotenv(project_root: &Path) -> anyhow::Result<()> {
    let env_path = project_root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
        return Ok(());
    }
    dotenvy::dotenv().ok();
    Ok(())
}

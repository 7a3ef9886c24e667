use std::path::{Path, PathBuf};

use whys_config::PROJECT_DIR;

/// Walk upwards from `start` until a `.whys` directory is found.
#[must_use]
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_DIR).is_dir())
        .map(Path::to_path_buf)
}

/// Resolve the project root from `--project` or the current directory.
///
/// Without an existing `.whys` directory the starting directory becomes the
/// root; `.whys/` is created there on first write.
pub fn resolve_project_root(project_override: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(path) = project_override {
        let explicit = PathBuf::from(path);
        if explicit.file_name().and_then(|name| name.to_str()) == Some(PROJECT_DIR) {
            return explicit.parent().map(Path::to_path_buf).ok_or_else(|| {
                anyhow::anyhow!("invalid --project path: '{PROJECT_DIR}' directory has no parent")
            });
        }
        if explicit.is_dir() {
            return Ok(explicit);
        }
        anyhow::bail!(
            "invalid --project '{}': directory does not exist",
            explicit.display()
        );
    }

    let cwd = std::env::current_dir()
        .map_err(|e| anyhow::anyhow!("failed to read current directory: {e}"))?;
    Ok(find_project_root(&cwd).unwrap_or(cwd))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn finds_project_root_in_parent_directory() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir(temp.path().join(".whys")).expect(".whys should create");
        std::fs::create_dir_all(temp.path().join("a/b/c")).expect("nested dirs should create");

        let found = find_project_root(&temp.path().join("a/b/c"));
        assert_eq!(found.as_deref(), Some(temp.path()));
    }

    #[test]
    fn returns_none_when_not_found() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir_all(temp.path().join("a/b")).expect("nested dirs should create");
        assert!(find_project_root(&temp.path().join("a/b")).is_none());
    }

    #[test]
    fn explicit_whys_dir_resolves_to_parent() {
        let temp = TempDir::new().expect("tempdir should create");
        let dot = temp.path().join(".whys");
        std::fs::create_dir(&dot).expect(".whys should create");

        let root = resolve_project_root(dot.to_str()).unwrap();
        assert_eq!(root, temp.path());
    }

    #[test]
    fn explicit_missing_dir_is_an_error() {
        let temp = TempDir::new().expect("tempdir should create");
        let missing = temp.path().join("nope");
        assert!(resolve_project_root(missing.to_str()).is_err());
    }
}

//! `tagtrace init`: writes a default `tagtrace.toml`.

use std::path::Path;

use tagtrace_config::{default_config_toml, CONFIG_FILE};

/// Runs the `tagtrace init` command in the current directory.
///
/// Refuses to overwrite an existing `tagtrace.toml` unless `force` is set.
/// Returns exit code 0 on success.
pub fn run(force: bool) -> Result<i32, Box<dyn std::error::Error>> {
    let dir = std::env::current_dir()?;
    let path = write_default_config(&dir, force)?;
    eprintln!("     Created {}", path.display());
    Ok(0)
}

fn write_default_config(
    dir: &Path,
    force: bool,
) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() && !force {
        return Err(format!("{} already exists (use --force to overwrite)", path.display()).into());
    }
    let mut content = default_config_toml()?;
    if let Some(name) = dir.file_name().and_then(|n| n.to_str()) {
        content = content.replacen("name = \"\"", &format!("name = \"{name}\""), 1);
    }
    std::fs::write(&path, content)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagtrace_config::load_config;

    #[test]
    fn writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        write_default_config(dir.path(), false).unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.taxonomy, tagtrace_config::Taxonomy::default());
        assert_eq!(config.cache.ttl_secs, 300);
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[project]\nname = \"x\"\n").unwrap();
        let err = write_default_config(dir.path(), false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert!(write_default_config(dir.path(), true).is_ok());
    }
}

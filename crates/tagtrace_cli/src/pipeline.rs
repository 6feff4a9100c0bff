//! Shared helpers for CLI commands: project root resolution, configuration
//! loading, and logging setup.

use std::path::{Path, PathBuf};

use tagtrace_config::{load_config_from_str, load_config_or_default, TraceConfig, CONFIG_FILE};
use tracing_subscriber::EnvFilter;

use crate::GlobalArgs;

/// Environment variable read for the log filter before `RUST_LOG`.
pub const LOG_ENV: &str = "TAGTRACE_LOG";

/// Walks up from `start` looking for the nearest directory containing
/// `tagtrace.toml`. Returns `None` if no ancestor has one.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).is_file() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// A project directory and the configuration that applies to it.
pub struct Project {
    /// Directory the configuration was found in, or the working directory.
    pub dir: PathBuf,
    /// The validated configuration.
    pub config: TraceConfig,
}

/// Resolves the project directory and loads its configuration.
///
/// With `--config`, a file is loaded directly and its parent becomes the
/// project directory; a directory is used as-is. Otherwise the nearest
/// ancestor holding `tagtrace.toml` is used, falling back to the working
/// directory with the default configuration.
pub fn load_project(global: &GlobalArgs) -> Result<Project, Box<dyn std::error::Error>> {
    if let Some(ref path) = global.config {
        if path.is_file() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            let config = load_config_from_str(&content)?;
            let dir = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            };
            return Ok(Project { dir, config });
        }
        if !path.is_dir() {
            return Err(format!("config path {} does not exist", path.display()).into());
        }
        let config = load_config_or_default(path)?;
        return Ok(Project {
            dir: path.clone(),
            config,
        });
    }

    let cwd = std::env::current_dir()?;
    let dir = find_project_root(&cwd).unwrap_or(cwd);
    let config = load_config_or_default(&dir)?;
    Ok(Project { dir, config })
}

/// Default log level for the given flags.
fn default_directive(global: &GlobalArgs) -> &'static str {
    if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    }
}

/// Installs the stderr log subscriber.
///
/// `--verbose` forces debug output. Otherwise `TAGTRACE_LOG`, then
/// `RUST_LOG`, then a level derived from `--quiet`.
pub fn init_logging(global: &GlobalArgs) {
    let default = default_directive(global);
    let filter = if global.verbose {
        EnvFilter::new(default)
    } else {
        std::env::var(LOG_ENV)
            .ok()
            .and_then(|v| EnvFilter::try_new(v).ok())
            .or_else(|| EnvFilter::try_from_default_env().ok())
            .unwrap_or_else(|| EnvFilter::new(default))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(global.color)
        .with_target(false)
        .try_init();
}

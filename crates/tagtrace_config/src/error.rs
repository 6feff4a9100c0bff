//! Why a `tagtrace.toml` was rejected.

use std::path::PathBuf;

/// A configuration that cannot drive a scan. Always an input error for the
/// caller, never a finding about the scanned project.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The TOML is malformed or has the wrong shape.
    #[error("malformed configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The default configuration could not be rendered.
    #[error("cannot render configuration: {0}")]
    Render(#[from] toml::ser::Error),

    /// The tiers overlap or the primary tier is empty.
    #[error("invalid taxonomy: {0}")]
    InvalidTaxonomy(String),

    /// A setting is out of range.
    #[error("`{key}` {problem}")]
    OutOfRange {
        /// Dotted key, e.g. `search.max_parallel`.
        key: &'static str,
        /// What is wrong with it.
        problem: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn out_of_range(key: &'static str, problem: &'static str) -> Self {
        Self::OutOfRange { key, problem }
    }
}

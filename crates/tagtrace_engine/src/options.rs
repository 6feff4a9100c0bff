//! Per-run options supplied by the caller.

use std::path::PathBuf;
use std::time::Duration;

/// Options for one run. Anything left `None` falls back to the project
/// configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    /// Project root. Scopes and the cache directory resolve against it.
    pub root: PathBuf,
    /// Scopes to scan instead of the configured ones. Each must exist.
    pub scopes: Option<Vec<PathBuf>>,
    /// Cache entry lifetime instead of `[cache] ttl_secs`.
    pub ttl: Option<Duration>,
    /// Ignore cache hits. Fresh results are still cached.
    pub force: bool,
    /// Cancel the run if analysis takes longer than this.
    pub deadline: Option<Duration>,
}

impl RunOptions {
    /// Options for `root` with everything else from the configuration.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            scopes: None,
            ttl: None,
            force: false,
            deadline: None,
        }
    }

    /// Overrides the configured scopes.
    pub fn with_scopes<I, P>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    /// Overrides the cache TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Forces a full rescan.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Sets a deadline for the analysis phase.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

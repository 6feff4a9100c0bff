//! In-memory [`Searcher`] used by tests and the conformance harness.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::SearchError;
use crate::searcher::{SearchHit, Searcher};

/// A searcher over a fixed set of in-memory files.
///
/// Counts every `search` call so tests can assert that cache hits skip the
/// search entirely. Scope-specific delays and failures apply to any searched
/// scope ending in the registered path, so `"docs"` matches
/// `/tmp/project/docs`.
#[derive(Debug, Default)]
pub struct MemorySearcher {
    files: Mutex<BTreeMap<PathBuf, String>>,
    calls: AtomicUsize,
    unavailable: bool,
    delay: Option<Duration>,
    scope_delays: BTreeMap<PathBuf, Duration>,
    failing_scopes: BTreeSet<PathBuf>,
}

impl MemorySearcher {
    /// Creates an empty searcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a searcher whose probe and searches always fail as unavailable.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Makes every search sleep for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Makes searches of one scope sleep for `delay`, overriding
    /// [`MemorySearcher::with_delay`] there.
    pub fn with_scope_delay(mut self, scope: impl Into<PathBuf>, delay: Duration) -> Self {
        self.scope_delays.insert(scope.into(), delay);
        self
    }

    /// Makes searches of one scope fail as if the tool exited with status 2.
    pub fn failing_scope(mut self, scope: impl Into<PathBuf>) -> Self {
        self.failing_scopes.insert(scope.into());
        self
    }

    fn delay_for(&self, scope: &Path) -> Option<Duration> {
        self.scope_delays
            .iter()
            .find(|(s, _)| scope.ends_with(s))
            .map(|(_, d)| *d)
            .or(self.delay)
    }

    /// Adds or replaces a file.
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Adds or replaces a file in place.
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), content.into());
    }

    /// Removes a file.
    pub fn remove(&self, path: &Path) {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path);
    }

    /// Number of `search` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Searcher for MemorySearcher {
    fn name(&self) -> &str {
        "memory"
    }

    async fn probe(&self) -> Result<String, SearchError> {
        if self.unavailable {
            return Err(SearchError::Unavailable {
                tool: "memory".to_string(),
                reason: "configured as unavailable".to_string(),
            });
        }
        Ok("memory searcher".to_string())
    }

    async fn search(&self, pattern: &str, scope: &Path) -> Result<Vec<SearchHit>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay_for(scope) {
            tokio::time::sleep(delay).await;
        }
        if self.failing_scopes.iter().any(|s| scope.ends_with(s)) {
            return Err(SearchError::Failed {
                status: 2,
                stderr: format!("{}: permission denied", scope.display()),
            });
        }
        if self.unavailable {
            return Err(SearchError::Unavailable {
                tool: "memory".to_string(),
                reason: "configured as unavailable".to_string(),
            });
        }

        let files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        let mut hits = Vec::new();
        for (path, content) in files.iter().filter(|(p, _)| p.starts_with(scope)) {
            for (idx, line) in content.lines().enumerate() {
                if line.contains(pattern) {
                    hits.push(SearchHit {
                        file: path.clone(),
                        line: u32::try_from(idx + 1).unwrap_or(u32::MAX),
                        text: line.to_string(),
                    });
                }
            }
        }
        Ok(hits)
    }
}

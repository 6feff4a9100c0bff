//! The tag parser: search, decode, and degrade.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tagtrace_common::TagMatch;

use crate::error::SearchError;
use crate::grammar::TagGrammar;
use crate::searcher::Searcher;

/// Result of the once-per-run availability probe.
///
/// Kept separate from search results so that "no tags found" can be told
/// apart from "the search tool could not run".
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Availability {
    /// The tool answered the probe.
    Available {
        /// Tool name.
        tool: String,
        /// Version string reported by the tool.
        version: String,
    },
    /// The tool could not be run.
    Unavailable {
        /// Tool name.
        tool: String,
        /// Why the probe failed.
        reason: String,
    },
}

impl Availability {
    /// Returns `true` if the probe succeeded.
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available { .. })
    }
}

/// Matches from a multi-scope search plus the warnings for any scope that
/// could not be searched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Decoded tags, ordered by `(file, line)`.
    pub matches: Vec<TagMatch>,
    /// One entry per failed `(pattern, scope)` search.
    pub warnings: Vec<String>,
}

/// Locates tag occurrences through a [`Searcher`] and decodes them.
#[derive(Clone)]
pub struct TagParser {
    searcher: Arc<dyn Searcher>,
    grammar: TagGrammar,
    timeout: Duration,
    root: Option<PathBuf>,
}

impl TagParser {
    /// Creates a parser with the given per-search timeout.
    pub fn new(searcher: Arc<dyn Searcher>, grammar: TagGrammar, timeout: Duration) -> Self {
        Self {
            searcher,
            grammar,
            timeout,
            root: None,
        }
    }

    /// Reports match paths relative to `root` when they lie beneath it.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// The underlying searcher.
    pub fn searcher(&self) -> &Arc<dyn Searcher> {
        &self.searcher
    }

    /// Checks whether the search primitive can run at all.
    pub async fn probe(&self) -> Availability {
        let tool = self.searcher.name().to_string();
        match tokio::time::timeout(self.timeout, self.searcher.probe()).await {
            Ok(Ok(version)) => Availability::Available { tool, version },
            Ok(Err(err)) => Availability::Unavailable {
                tool,
                reason: err.to_string(),
            },
            Err(_) => Availability::Unavailable {
                tool,
                reason: format!("probe timed out after {:?}", self.timeout),
            },
        }
    }

    /// Searches one scope for one pattern.
    ///
    /// Lines that do not decode into a tag are skipped. The error is
    /// returned to the caller, which decides how to degrade.
    pub async fn search_scope(
        &self,
        pattern: &str,
        scope: &Path,
    ) -> Result<Vec<TagMatch>, SearchError> {
        let hits = tokio::time::timeout(self.timeout, self.searcher.search(pattern, scope))
            .await
            .map_err(|_| SearchError::Timeout {
                pattern: pattern.to_string(),
                scope: scope.to_path_buf(),
                timeout: self.timeout,
            })??;

        let mut matches = Vec::with_capacity(hits.len());
        for hit in hits {
            let file = self.relativize(&hit.file);
            match self.grammar.parse_line(pattern, &file, hit.line, &hit.text) {
                Some(tag) => matches.push(tag),
                None => tracing::debug!(
                    file = %file.display(),
                    line = hit.line,
                    "skipping malformed tag line"
                ),
            }
        }
        tracing::debug!(
            pattern,
            scope = %scope.display(),
            found = matches.len(),
            "search complete"
        );
        Ok(matches)
    }

    /// Searches every scope for `pattern` and combines the results.
    ///
    /// A failing scope contributes no matches and one warning; this never
    /// fails as a whole.
    pub async fn search(&self, pattern: &str, scope_dirs: &[PathBuf]) -> ParseOutcome {
        let results = join_all(
            scope_dirs
                .iter()
                .map(|scope| async move { (scope, self.search_scope(pattern, scope).await) }),
        )
        .await;

        let mut outcome = ParseOutcome::default();
        for (scope, result) in results {
            match result {
                Ok(found) => outcome.matches.extend(found),
                Err(err) => {
                    tracing::warn!(pattern, scope = %scope.display(), "search failed: {err}");
                    outcome.warnings.push(err.to_string());
                }
            }
        }
        outcome.matches.sort_by(TagMatch::cmp_location);
        outcome
    }

    fn relativize(&self, file: &Path) -> PathBuf {
        match &self.root {
            Some(root) => file.strip_prefix(root).unwrap_or(file).to_path_buf(),
            None => file.to_path_buf(),
        }
    }
}

impl std::fmt::Debug for TagParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagParser")
            .field("searcher", &self.searcher.name())
            .field("timeout", &self.timeout)
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySearcher;
    use pretty_assertions::assert_eq;

    fn parser(searcher: MemorySearcher) -> TagParser {
        TagParser::new(Arc::new(searcher), TagGrammar::new(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn search_decodes_and_sorts() {
        let searcher = MemorySearcher::new()
            .with_file("src/b.rs", "// @TEST:AUTH-100 second\n")
            .with_file(
                "src/a.rs",
                "// nothing\n// @TEST:AUTH-101 first, see DESIGN:AUTH-101\n",
            );
        let outcome = parser(searcher)
            .search("@TEST:", &[PathBuf::from("src")])
            .await;
        assert!(outcome.warnings.is_empty());
        let found: Vec<String> = outcome.matches.iter().map(TagMatch::location).collect();
        assert_eq!(found, vec!["src/a.rs:2", "src/b.rs:1"]);
        assert_eq!(outcome.matches[0].references, vec!["DESIGN:AUTH-101"]);
    }

    #[tokio::test]
    async fn malformed_lines_are_skipped() {
        let searcher = MemorySearcher::new()
            .with_file("src/a.rs", "// @TEST: nothing here\n// @TEST:A-1\n");
        let outcome = parser(searcher)
            .search("@TEST:", &[PathBuf::from("src")])
            .await;
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].identifier, "A-1");
    }

    #[tokio::test]
    async fn unavailable_tool_degrades_to_warning() {
        let p = parser(MemorySearcher::unavailable());
        assert!(!p.probe().await.is_available());
        let outcome = p
            .search("@TEST:", &[PathBuf::from("src"), PathBuf::from("docs")])
            .await;
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.warnings.len(), 2);
    }

    #[tokio::test]
    async fn slow_search_times_out() {
        let searcher = MemorySearcher::new()
            .with_file("src/a.rs", "// @TEST:A-1\n")
            .with_delay(Duration::from_millis(200));
        let p = TagParser::new(
            Arc::new(searcher),
            TagGrammar::new(),
            Duration::from_millis(10),
        );
        let err = p
            .search_scope("@TEST:", Path::new("src"))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn paths_are_relative_to_root() {
        let searcher = MemorySearcher::new().with_file("/repo/src/a.rs", "// @TASK:A-1\n");
        let p = parser(searcher).with_root("/repo");
        let found = p
            .search_scope("@TASK:", Path::new("/repo/src"))
            .await
            .unwrap();
        assert_eq!(found[0].file, PathBuf::from("src/a.rs"));
    }

    #[tokio::test]
    async fn probe_reports_version() {
        let p = parser(MemorySearcher::new());
        assert_eq!(
            p.probe().await,
            Availability::Available {
                tool: "memory".to_string(),
                version: "memory searcher".to_string(),
            }
        );
    }
}

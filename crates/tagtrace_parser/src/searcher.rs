//! The text-search capability the parser is built on.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// One line matched by a literal search.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SearchHit {
    /// The file containing the match.
    pub file: PathBuf,
    /// The 1-indexed line number.
    pub line: u32,
    /// The full text of the matched line.
    pub text: String,
}

/// A recursive, literal text search over a directory tree.
///
/// Implementations must treat `pattern` as a fixed string, not a regular
/// expression, and must be safe to call concurrently.
#[async_trait]
pub trait Searcher: Send + Sync {
    /// A short name for diagnostics, e.g. `rg`.
    fn name(&self) -> &str;

    /// Checks that the search primitive can run, returning its version or
    /// some other identifying string.
    async fn probe(&self) -> Result<String, SearchError>;

    /// Returns every line under `scope` containing `pattern`.
    ///
    /// A search with no matches is `Ok(vec![])`, not an error.
    async fn search(&self, pattern: &str, scope: &Path) -> Result<Vec<SearchHit>, SearchError>;
}

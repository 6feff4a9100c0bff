//! The on-disk cache index.
//!
//! Stored as `cache_index.json` in the cache directory. Each entry holds the
//! decoded matches of one `(pattern, scope)` search together with the mtimes
//! of every path under the scope when the search ran.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tagtrace_common::{SearchKey, TagMatch};

use crate::error::CacheError;

/// Name of the index file within the cache directory.
pub const INDEX_FILE: &str = "cache_index.json";

/// Format version of the index. Bumped whenever [`CacheEntry`] changes shape.
pub const INDEX_FORMAT: u32 = 1;

/// All cached search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheIndex {
    /// Index file format version.
    pub format: u32,
    /// Version of the tool that wrote the index.
    pub tool_version: String,
    /// Entries keyed by [`CacheIndex::key`].
    pub entries: BTreeMap<String, CacheEntry>,
}

/// Matches for one `(pattern, scope)` search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The literal pattern searched for.
    pub pattern: String,
    /// The scope directory searched.
    pub scope: PathBuf,
    /// The decoded matches, exactly as the parser returned them.
    pub matches: Vec<TagMatch>,
    /// Mtime in nanoseconds of every path under the scope when cached.
    pub file_mtimes: BTreeMap<PathBuf, u64>,
    /// When the entry was stored.
    pub cached_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Age of the entry relative to `now`, or `None` if it lies in the future.
    pub fn age(&self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        now.signed_duration_since(self.cached_at).to_std().ok()
    }
}

impl CacheIndex {
    /// Creates an empty index for the given tool version.
    pub fn new(tool_version: &str) -> Self {
        Self {
            format: INDEX_FORMAT,
            tool_version: tool_version.to_string(),
            entries: BTreeMap::new(),
        }
    }

    /// Returns the entry key for a search.
    pub fn key(pattern: &str, scope: &Path) -> String {
        SearchKey::new(pattern, scope).to_string()
    }

    /// Loads the index, returning `None` if it is missing or unparseable.
    pub fn load(cache_dir: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(cache_dir.join(INDEX_FILE)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Writes the index, creating the cache directory if needed.
    pub fn save(&self, cache_dir: &Path) -> Result<(), CacheError> {
        std::fs::create_dir_all(cache_dir).map_err(|e| CacheError::Io {
            path: cache_dir.to_path_buf(),
            source: e,
        })?;
        let path = cache_dir.join(INDEX_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;
        std::fs::write(&path, json).map_err(|e| CacheError::Io { path, source: e })
    }

    /// Returns `true` if the index was written by a compatible version.
    pub fn is_compatible(&self, tool_version: &str) -> bool {
        self.format == INDEX_FORMAT && self.tool_version == tool_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> CacheEntry {
        CacheEntry {
            pattern: "@TEST:".to_string(),
            scope: PathBuf::from("src"),
            matches: vec![TagMatch {
                category: "TEST".to_string(),
                identifier: "A-1".to_string(),
                description: String::new(),
                file: PathBuf::from("src/a.rs"),
                line: 4,
                references: vec![],
            }],
            file_mtimes: BTreeMap::from([(PathBuf::from("src/a.rs"), 42)]),
            cached_at: Utc::now(),
        }
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = CacheIndex::new("0.1.0");
        index
            .entries
            .insert(CacheIndex::key("@TEST:", Path::new("src")), entry());
        index.save(dir.path()).unwrap();

        let loaded = CacheIndex::load(dir.path()).unwrap();
        assert_eq!(loaded, index);
    }

    #[test]
    fn load_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CacheIndex::load(dir.path()).is_none());
    }

    #[test]
    fn load_corrupt_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(INDEX_FILE), "{ not json").unwrap();
        assert!(CacheIndex::load(dir.path()).is_none());
    }

    #[test]
    fn save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join(".tagtrace");
        CacheIndex::new("0.1.0").save(&nested).unwrap();
        assert!(nested.join(INDEX_FILE).exists());
    }

    #[test]
    fn compatibility() {
        let index = CacheIndex::new("0.1.0");
        assert!(index.is_compatible("0.1.0"));
        assert!(!index.is_compatible("0.2.0"));
    }

    #[test]
    fn keys_distinguish_pattern_and_scope() {
        let a = CacheIndex::key("@TEST:", Path::new("src"));
        assert_eq!(a, CacheIndex::key("@TEST:", Path::new("src")));
        assert_ne!(a, CacheIndex::key("@TASK:", Path::new("src")));
        assert_ne!(a, CacheIndex::key("@TEST:", Path::new("docs")));
    }

    #[test]
    fn future_entry_has_no_age() {
        let mut e = entry();
        e.cached_at = Utc::now() + chrono::Duration::hours(1);
        assert!(e.age(Utc::now()).is_none());
    }
}

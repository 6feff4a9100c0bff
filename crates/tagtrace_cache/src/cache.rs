//! High-level scan cache.
//!
//! [`ScanCache`] is constructed once per run, passed by reference to the
//! engine, and saved once at the end of a successful run. It never writes
//! to disk on its own.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tagtrace_common::TagMatch;

use crate::error::CacheError;
use crate::index::{CacheEntry, CacheIndex};
use crate::mtime::{mtime_nanos, stat_all};
use crate::snapshot::{ChangeSet, ScanSnapshot};

/// TTL- and mtime-validated memo of search results, plus the last-scan
/// snapshot and an in-process file content memo.
#[derive(Debug)]
pub struct ScanCache {
    cache_dir: PathBuf,
    index: CacheIndex,
    snapshot: Option<ScanSnapshot>,
    contents: HashMap<PathBuf, (u64, Arc<str>)>,
}

impl ScanCache {
    /// Loads existing cache state or starts empty.
    ///
    /// An index written by another tool version is discarded. A missing or
    /// corrupt snapshot means every file will be reported as changed.
    pub fn load_or_create(cache_dir: &Path, tool_version: &str) -> Self {
        let index = CacheIndex::load(cache_dir)
            .filter(|i| i.is_compatible(tool_version))
            .unwrap_or_else(|| CacheIndex::new(tool_version));
        let snapshot = ScanSnapshot::load(cache_dir);
        tracing::debug!(
            dir = %cache_dir.display(),
            entries = index.entries.len(),
            snapshot = snapshot.is_some(),
            "cache loaded"
        );
        Self {
            cache_dir: cache_dir.to_path_buf(),
            index,
            snapshot,
            contents: HashMap::new(),
        }
    }

    /// An empty cache rooted at `cache_dir`, ignoring anything on disk.
    pub fn empty(cache_dir: &Path, tool_version: &str) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
            index: CacheIndex::new(tool_version),
            snapshot: None,
            contents: HashMap::new(),
        }
    }

    /// The cache directory.
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// The current index.
    pub fn index(&self) -> &CacheIndex {
        &self.index
    }

    /// Returns the cached matches for a search if the entry is younger than
    /// `ttl` and every path it recorded still has the same mtime.
    pub fn get(&self, pattern: &str, scope: &Path, ttl: Duration) -> Option<Vec<TagMatch>> {
        let entry = self.index.entries.get(&CacheIndex::key(pattern, scope))?;
        match entry.age(Utc::now()) {
            Some(age) if age < ttl => {}
            _ => {
                tracing::debug!(pattern, scope = %scope.display(), "cache entry expired");
                return None;
            }
        }
        for (path, &recorded) in &entry.file_mtimes {
            match mtime_nanos(path) {
                Ok(live) if live == recorded => {}
                _ => {
                    tracing::debug!(
                        pattern,
                        path = %path.display(),
                        "cache entry invalidated by file change"
                    );
                    return None;
                }
            }
        }
        Some(entry.matches.clone())
    }

    /// Stores the matches of a search along with the current mtimes of
    /// `tracked_paths` (normally every file and directory under `scope`).
    ///
    /// If any tracked path cannot be stat'ed the entry is not stored, since
    /// it could never be validated. Returns whether the entry was stored.
    pub fn put(
        &mut self,
        pattern: &str,
        scope: &Path,
        matches: Vec<TagMatch>,
        tracked_paths: &[PathBuf],
    ) -> bool {
        let (file_mtimes, failed) = stat_all(tracked_paths);
        if !failed.is_empty() {
            tracing::debug!(
                pattern,
                unreadable = failed.len(),
                "not caching search with unreadable paths"
            );
            self.index.entries.remove(&CacheIndex::key(pattern, scope));
            return false;
        }
        self.put_stamped(pattern, scope, matches, file_mtimes);
        true
    }

    /// Stores the matches of a search against mtimes taken before the
    /// search started. A file edited while the search ran then no longer
    /// matches its recorded mtime and the entry misses next time.
    pub fn put_stamped(
        &mut self,
        pattern: &str,
        scope: &Path,
        matches: Vec<TagMatch>,
        file_mtimes: BTreeMap<PathBuf, u64>,
    ) {
        self.index.entries.insert(
            CacheIndex::key(pattern, scope),
            CacheEntry {
                pattern: pattern.to_string(),
                scope: scope.to_path_buf(),
                matches,
                file_mtimes,
                cached_at: Utc::now(),
            },
        );
    }

    /// Drops every entry and the content memo.
    pub fn clear(&mut self) {
        self.index.entries.clear();
        self.contents.clear();
    }

    /// Drops entries older than `ttl`. Returns how many were removed.
    pub fn remove_expired(&mut self, ttl: Duration) -> usize {
        let now = Utc::now();
        let before = self.index.entries.len();
        self.index
            .entries
            .retain(|_, e| e.age(now).is_some_and(|age| age < ttl));
        before - self.index.entries.len()
    }

    /// Reads a file through the content memo. The file is re-read only when
    /// its mtime moved since the last read.
    pub fn read_content(&mut self, path: &Path) -> Option<Arc<str>> {
        let mtime = mtime_nanos(path).ok()?;
        if let Some((cached_mtime, text)) = self.contents.get(path) {
            if *cached_mtime == mtime {
                return Some(Arc::clone(text));
            }
        }
        let text: Arc<str> = std::fs::read_to_string(path).ok()?.into();
        self.contents
            .insert(path.to_path_buf(), (mtime, Arc::clone(&text)));
        Some(text)
    }

    /// Files among `files` whose mtime moved since the last saved snapshot.
    ///
    /// Without a snapshot every file is returned.
    pub fn changed_since_last_scan(&self, files: &[PathBuf]) -> BTreeSet<PathBuf> {
        self.change_set(files).changed()
    }

    /// Full comparison of `files` against the last saved snapshot.
    pub fn change_set(&self, files: &[PathBuf]) -> ChangeSet {
        match &self.snapshot {
            Some(snapshot) => snapshot.diff(files),
            None => ChangeSet::all_new(files),
        }
    }

    /// Captures and persists the mtimes of `files` as the new last-scan
    /// snapshot.
    pub fn save_scan_snapshot(&mut self, files: &[PathBuf]) -> Result<(), CacheError> {
        self.store_snapshot(ScanSnapshot::capture(files))
    }

    /// Persists already-taken mtimes as the new last-scan snapshot.
    pub fn save_scan_snapshot_stamped(
        &mut self,
        mtimes: BTreeMap<PathBuf, u64>,
    ) -> Result<(), CacheError> {
        self.store_snapshot(ScanSnapshot::from_mtimes(mtimes))
    }

    fn store_snapshot(&mut self, snapshot: ScanSnapshot) -> Result<(), CacheError> {
        snapshot.save(&self.cache_dir)?;
        self.snapshot = Some(snapshot);
        Ok(())
    }

    /// Forgets the last-scan snapshot, on disk and in memory.
    pub fn clear_snapshot(&mut self) -> Result<(), CacheError> {
        self.snapshot = None;
        ScanSnapshot::remove(&self.cache_dir)
    }

    /// Persists the index.
    pub fn save(&self) -> Result<(), CacheError> {
        self.index.save(&self.cache_dir)
    }
}

//! Last-scan snapshot and change detection.
//!
//! The snapshot records the mtime of every file a successful run looked at.
//! The next run compares live mtimes against it to find what moved. The
//! comparison fails open: without a readable snapshot every file counts as
//! changed.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::mtime::mtime_nanos;

/// Name of the snapshot file within the cache directory.
pub const SNAPSHOT_FILE: &str = "last_scan.json";

/// Mtime differences at or below this many nanoseconds are ignored.
pub const MTIME_TOLERANCE_NS: u64 = 1_000_000;

/// File mtimes captured at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    /// When the snapshot was taken.
    pub taken_at: DateTime<Utc>,
    /// Mtime in nanoseconds per file.
    pub files: BTreeMap<PathBuf, u64>,
}

/// Result of comparing live files against a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Files absent from the snapshot.
    pub new_files: Vec<PathBuf>,
    /// Files whose mtime moved beyond the tolerance, or could not be read.
    pub modified_files: Vec<PathBuf>,
    /// Files in the snapshot but not in the current list.
    pub deleted_files: Vec<PathBuf>,
    /// Files whose mtime is within tolerance.
    pub unchanged_files: Vec<PathBuf>,
}

impl ChangeSet {
    /// Returns `true` if nothing was added, modified, or deleted.
    pub fn is_empty(&self) -> bool {
        self.new_files.is_empty() && self.modified_files.is_empty() && self.deleted_files.is_empty()
    }

    /// New and modified files, the ones a caller would need to look at again.
    pub fn changed(&self) -> BTreeSet<PathBuf> {
        self.new_files
            .iter()
            .chain(&self.modified_files)
            .cloned()
            .collect()
    }

    /// Treats every file as new.
    pub fn all_new(files: &[PathBuf]) -> Self {
        let mut new_files = files.to_vec();
        new_files.sort();
        new_files.dedup();
        Self {
            new_files,
            ..Self::default()
        }
    }
}

impl ScanSnapshot {
    /// Captures the current mtimes of `files`. Unreadable files are left out,
    /// so they count as new next time.
    pub fn capture(files: &[PathBuf]) -> Self {
        Self::from_mtimes(
            files
                .iter()
                .filter_map(|f| mtime_nanos(f).ok().map(|ns| (f.clone(), ns)))
                .collect(),
        )
    }

    /// A snapshot of mtimes read earlier, e.g. before the searches ran.
    pub fn from_mtimes(files: BTreeMap<PathBuf, u64>) -> Self {
        Self {
            taken_at: Utc::now(),
            files,
        }
    }

    /// Loads the snapshot, returning `None` if it is missing or unparseable.
    pub fn load(cache_dir: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(cache_dir.join(SNAPSHOT_FILE)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Writes the snapshot, creating the cache directory if needed.
    pub fn save(&self, cache_dir: &Path) -> Result<(), CacheError> {
        std::fs::create_dir_all(cache_dir).map_err(|e| CacheError::Io {
            path: cache_dir.to_path_buf(),
            source: e,
        })?;
        let path = cache_dir.join(SNAPSHOT_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;
        std::fs::write(&path, json).map_err(|e| CacheError::Io { path, source: e })
    }

    /// Deletes the snapshot file if present.
    pub fn remove(cache_dir: &Path) -> Result<(), CacheError> {
        let path = cache_dir.join(SNAPSHOT_FILE);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io { path, source: e }),
        }
    }

    /// Compares the live mtimes of `files` against this snapshot.
    pub fn diff(&self, files: &[PathBuf]) -> ChangeSet {
        let mut changes = ChangeSet::default();
        let mut current: BTreeSet<&PathBuf> = BTreeSet::new();

        for file in files {
            if !current.insert(file) {
                continue;
            }
            match (self.files.get(file), mtime_nanos(file)) {
                (None, _) => changes.new_files.push(file.clone()),
                (Some(_), Err(_)) => changes.modified_files.push(file.clone()),
                (Some(&recorded), Ok(live)) if recorded.abs_diff(live) > MTIME_TOLERANCE_NS => {
                    changes.modified_files.push(file.clone());
                }
                (Some(_), Ok(_)) => changes.unchanged_files.push(file.clone()),
            }
        }
        changes.deleted_files = self
            .files
            .keys()
            .filter(|p| !current.contains(p))
            .cloned()
            .collect();

        changes.new_files.sort();
        changes.modified_files.sort();
        changes.unchanged_files.sort();
        changes
    }
}

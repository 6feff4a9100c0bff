//! Modification-time helpers.
//!
//! Mtimes are stored as nanoseconds since the Unix epoch so they round-trip
//! through JSON without precision loss.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Returns the modification time of `path` in nanoseconds since the epoch.
pub fn mtime_nanos(path: &Path) -> io::Result<u64> {
    let modified = std::fs::metadata(path)?.modified()?;
    let since = modified
        .duration_since(UNIX_EPOCH)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    u64::try_from(since.as_nanos()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Stats every path, returning the mtimes of those that could be read and
/// the paths that could not.
pub fn stat_all(paths: &[PathBuf]) -> (BTreeMap<PathBuf, u64>, Vec<PathBuf>) {
    let mut mtimes = BTreeMap::new();
    let mut failed = Vec::new();
    for path in paths {
        match mtime_nanos(path) {
            Ok(ns) => {
                mtimes.insert(path.clone(), ns);
            }
            Err(_) => failed.push(path.clone()),
        }
    }
    (mtimes, failed)
}

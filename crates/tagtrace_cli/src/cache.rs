//! `tagtrace cache`: maintenance of the on-disk scan cache.

use std::path::Path;
use std::time::Duration;

use tagtrace_cache::{CacheIndex, ScanCache};

use crate::pipeline::load_project;
use crate::{CacheCommand, GlobalArgs};

/// Runs a `tagtrace cache` subcommand. Returns exit code 0 on success.
pub fn run(command: &CacheCommand, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let cache_dir = project.dir.join(&project.config.cache.dir);
    if !cache_dir.is_dir() {
        if !global.quiet {
            eprintln!("  No cache at {}", cache_dir.display());
        }
        return Ok(0);
    }

    match command {
        CacheCommand::Clear => {
            let removed = clear(&cache_dir)?;
            if !global.quiet {
                eprintln!("   Cleared {removed} cache entries in {}", cache_dir.display());
            }
        }
        CacheCommand::Prune { ttl_secs } => {
            let ttl = Duration::from_secs(ttl_secs.unwrap_or(project.config.cache.ttl_secs));
            let removed = prune(&cache_dir, ttl)?;
            if !global.quiet {
                eprintln!("    Pruned {removed} expired cache entries");
            }
        }
    }
    Ok(0)
}

/// Opens the cache under whatever tool version wrote it, so maintenance
/// works on indexes from any `rg` version.
fn open(cache_dir: &Path) -> ScanCache {
    let version = CacheIndex::load(cache_dir)
        .map(|index| index.tool_version)
        .unwrap_or_default();
    ScanCache::load_or_create(cache_dir, &version)
}

/// Drops every entry and the last-scan snapshot. Returns the entry count.
fn clear(cache_dir: &Path) -> Result<usize, Box<dyn std::error::Error>> {
    let mut cache = open(cache_dir);
    let removed = cache.index().entries.len();
    cache.clear();
    cache.save()?;
    cache.clear_snapshot()?;
    tracing::debug!(removed, "cache cleared");
    Ok(removed)
}

fn prune(cache_dir: &Path, ttl: Duration) -> Result<usize, Box<dyn std::error::Error>> {
    let mut cache = open(cache_dir);
    let removed = cache.remove_expired(ttl);
    if removed > 0 {
        cache.save()?;
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tagtrace_cache::ScanSnapshot;

    fn populated(dir: &Path) -> PathBuf {
        let cache_dir = dir.join(".tagtrace");
        let file = dir.join("a.rs");
        std::fs::write(&file, "// @TASK:A-1").unwrap();
        let mut cache = ScanCache::empty(&cache_dir, "tagtrace 0.1.0; rg 14.1.0");
        assert!(cache.put("@TASK:", dir, Vec::new(), std::slice::from_ref(&file)));
        cache.save().unwrap();
        cache.save_scan_snapshot(&[file]).unwrap();
        cache_dir
    }

    #[test]
    fn clear_drops_entries_and_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = populated(dir.path());
        assert_eq!(clear(&cache_dir).unwrap(), 1);

        let index = CacheIndex::load(&cache_dir).unwrap();
        assert!(index.entries.is_empty());
        assert_eq!(index.tool_version, "tagtrace 0.1.0; rg 14.1.0");
        assert!(ScanSnapshot::load(&cache_dir).is_none());
    }

    #[test]
    fn prune_keeps_fresh_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = populated(dir.path());
        assert_eq!(prune(&cache_dir, Duration::from_secs(3600)).unwrap(), 0);
        assert_eq!(CacheIndex::load(&cache_dir).unwrap().entries.len(), 1);
    }

    #[test]
    fn prune_with_zero_ttl_drops_everything() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = populated(dir.path());
        assert_eq!(prune(&cache_dir, Duration::ZERO).unwrap(), 1);
        assert!(CacheIndex::load(&cache_dir).unwrap().entries.is_empty());
    }
}

//! Scope enumeration with the same ignore rules `rg` applies.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::CacheError;

/// Lists every file under `scope`, sorted.
pub fn list_scope_files(scope: &Path) -> Result<Vec<PathBuf>, CacheError> {
    walk(scope, false)
}

/// Lists every file and directory under `scope` (including `scope`), sorted.
///
/// Directory mtimes change when entries are added or removed, so recording
/// them alongside file mtimes lets a cache entry notice new files.
pub fn list_scope_paths(scope: &Path) -> Result<Vec<PathBuf>, CacheError> {
    walk(scope, true)
}

fn walk(scope: &Path, include_dirs: bool) -> Result<Vec<PathBuf>, CacheError> {
    if !scope.is_dir() {
        return Err(CacheError::Walk {
            path: scope.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }
    let mut paths = Vec::new();
    for entry in WalkBuilder::new(scope).build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(scope = %scope.display(), "skipping unreadable entry: {err}");
                continue;
            }
        };
        let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
        if is_dir && !include_dirs {
            continue;
        }
        paths.push(entry.into_path());
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        std::fs::write(dir.path().join("src/a.rs"), "a").unwrap();
        std::fs::write(dir.path().join("src/nested/b.rs"), "b").unwrap();
        std::fs::write(dir.path().join("src/.hidden.rs"), "h").unwrap();
        dir
    }

    #[test]
    fn lists_files_only() {
        let dir = tree();
        let files = list_scope_files(&dir.path().join("src")).unwrap();
        assert_eq!(
            files,
            vec![
                dir.path().join("src/a.rs"),
                dir.path().join("src/nested/b.rs"),
            ]
        );
    }

    #[test]
    fn lists_directories_too() {
        let dir = tree();
        let paths = list_scope_paths(&dir.path().join("src")).unwrap();
        assert!(paths.contains(&dir.path().join("src")));
        assert!(paths.contains(&dir.path().join("src/nested")));
        assert_eq!(paths.len(), 4);
    }

    #[test]
    fn missing_scope_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_scope_files(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, CacheError::Walk { .. }));
    }
}

//! Scope resolution and the list of searches a run performs.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use crate::error::EngineError;

/// One search: a literal pattern over one scope directory.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScanUnit {
    /// Literal tag prefix.
    pub pattern: String,
    /// Absolute scope directory.
    pub scope: PathBuf,
}

impl ScanUnit {
    /// Every pattern over every scope, scope-major.
    pub fn expand(patterns: &[String], scopes: &[PathBuf]) -> Vec<ScanUnit> {
        scopes
            .iter()
            .flat_map(|scope| {
                patterns.iter().map(move |pattern| ScanUnit {
                    pattern: pattern.clone(),
                    scope: scope.clone(),
                })
            })
            .collect()
    }
}

/// Resolves scope entries against `root`.
///
/// A scope must stay inside the root and, if it exists, be a directory.
/// When `require_existing` is `false`, scopes that do not exist are
/// dropped; otherwise they are an error. The result is sorted and free of
/// duplicates.
pub fn resolve_scopes(
    root: &Path,
    scopes: &[PathBuf],
    require_existing: bool,
) -> Result<Vec<PathBuf>, EngineError> {
    let mut resolved = BTreeSet::new();
    for scope in scopes {
        let invalid = |reason: &str| EngineError::InvalidScope {
            path: scope.clone(),
            reason: reason.to_string(),
        };
        if scope.components().any(|c| c == Component::ParentDir) {
            return Err(invalid("must not contain `..`"));
        }
        let path = if scope.is_absolute() {
            if !scope.starts_with(root) {
                return Err(invalid("is outside the project root"));
            }
            scope.clone()
        } else {
            root.join(scope)
        };
        if !path.exists() {
            if require_existing {
                return Err(invalid("does not exist"));
            }
            tracing::info!(scope = %scope.display(), "configured scope does not exist; skipped");
            continue;
        }
        if !path.is_dir() {
            return Err(invalid("is not a directory"));
        }
        resolved.insert(path);
    }
    Ok(resolved.into_iter().collect())
}

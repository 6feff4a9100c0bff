//! Error types for cache operations.

use std::path::PathBuf;

/// Errors that can occur while persisting or enumerating cache state.
///
/// Loads never produce these: an unreadable cache is a miss. Only saves and
/// scope enumeration report errors, and the engine turns them into warnings.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing cache files.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A cache structure could not be serialized.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },

    /// Walking a scope directory failed.
    #[error("failed to walk {path}: {reason}")]
    Walk {
        /// The scope being walked.
        path: PathBuf,
        /// Description of the walk failure.
        reason: String,
    },
}

//! Error types for search invocations.

use std::path::PathBuf;
use std::time::Duration;

/// Errors raised by a single `(pattern, scope)` search.
///
/// All of these are transient from the run's point of view: the parser
/// converts them into warnings and an empty result for that pair.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The search primitive could not be started at all.
    #[error("search tool `{tool}` is unavailable: {reason}")]
    Unavailable {
        /// The tool that was invoked.
        tool: String,
        /// Why it could not be used.
        reason: String,
    },

    /// The search did not finish within the configured timeout.
    #[error("search for `{pattern}` in {scope} timed out after {timeout:?}")]
    Timeout {
        /// The pattern being searched.
        pattern: String,
        /// The scope directory.
        scope: PathBuf,
        /// The timeout that elapsed.
        timeout: Duration,
    },

    /// The search tool exited with an unexpected status.
    #[error("search tool exited with status {status}: {stderr}")]
    Failed {
        /// The exit status code, or -1 if killed by a signal.
        status: i32,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The search tool's output could not be decoded.
    #[error("failed to decode search output: {reason}")]
    Decode {
        /// Description of the decoding failure.
        reason: String,
    },
}

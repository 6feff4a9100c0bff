//! Errors that stop a run.

use std::path::PathBuf;
use std::time::Duration;

use tagtrace_common::InternalError;
use tagtrace_config::ConfigError;
use tagtrace_graph::ValidationError;

/// Errors that end a run without a report.
///
/// A missing search tool is not one of them: that produces a report with
/// [`RunStatus::Failed`](tagtrace_report::RunStatus::Failed).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The search produced a match that violates the data model.
    #[error("malformed scan result: {0}")]
    Validation(#[from] ValidationError),

    /// The project root is not a directory.
    #[error("project root {path} is not a directory")]
    InvalidRoot {
        /// The offending root.
        path: PathBuf,
    },

    /// A scope is unusable.
    #[error("invalid scope {path}: {reason}")]
    InvalidScope {
        /// The scope as given.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// The caller cancelled the run.
    #[error("run cancelled")]
    Cancelled,

    /// The run did not finish within its deadline.
    #[error("run did not finish within {0:?}")]
    DeadlineExceeded(Duration),

    /// A bug in tagtrace.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

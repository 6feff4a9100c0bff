//! Failures that point at a tagtrace bug, not at the scanned project.

use std::fmt;

/// Pipeline step whose background task died.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Stage {
    /// Building and checking the tag graph.
    Validation,
    /// Turning the outcome into a report.
    Report,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Validation => "validation",
            Stage::Report => "report",
        })
    }
}

/// A bug surfaced while running `stage`. Findings about the project are
/// never reported this way.
#[derive(Debug, thiserror::Error)]
#[error("internal error in {stage} stage: {message}")]
pub struct InternalError {
    /// Where it happened.
    pub stage: Stage,
    /// What went wrong.
    pub message: String,
}

impl InternalError {
    /// A stage's worker panicked or was aborted.
    pub fn task_failed(stage: Stage, cause: impl fmt::Display) -> Self {
        Self {
            stage,
            message: format!("worker task failed: {cause}"),
        }
    }
}

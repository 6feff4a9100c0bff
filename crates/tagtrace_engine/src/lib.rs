//! One batch traceability run.
//!
//! [`TraceEngine::run`] probes the search tool, serves `(pattern, scope)`
//! searches from the [`ScanCache`](tagtrace_cache::ScanCache) where it can,
//! runs the rest with bounded concurrency, validates the combined match set,
//! persists the cache once, and returns a
//! [`TraceReport`](tagtrace_report::TraceReport).
//!
//! Degraded paths (a search timing out, the cache directory being unwritable)
//! become report warnings. Input errors and cancellation are returned as
//! [`EngineError`].

#![warn(missing_docs)]

mod cancel;
mod engine;
mod error;
mod io;
mod options;
mod plan;

pub use cancel::{CancelErr, OrCancelExt};
pub use engine::{TraceEngine, TOOL_VERSION};
pub use error::EngineError;
pub use options::RunOptions;
pub use plan::{resolve_scopes, ScanUnit};

//! Persistent scan cache for the tagtrace engine.
//!
//! Three pieces of state live under the cache directory:
//!
//! - `cache_index.json`: matches per `(pattern, scope)` search, each with the
//!   wall-clock time it was cached and the mtimes of every path under the
//!   scope at that moment ([`ScanCache`]).
//! - `last_scan.json`: the mtimes of all files seen by the last successful
//!   run ([`ScanSnapshot`]), used to report what changed since.
//! - an in-process content memo so downstream passes do not re-read files
//!   whose mtime has not moved.
//!
//! Every read is fail-safe: a missing, corrupt, or incompatible file simply
//! behaves like an empty cache.

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod index;
pub mod mtime;
pub mod scope;
pub mod snapshot;

pub use cache::ScanCache;
pub use error::CacheError;
pub use index::{CacheEntry, CacheIndex};
pub use mtime::stat_all;
pub use scope::{list_scope_files, list_scope_paths};
pub use snapshot::{ChangeSet, ScanSnapshot, SNAPSHOT_FILE};

//! Tag extraction for annotation-based traceability.
//!
//! The parser locates `@CATEGORY:IDENTIFIER` annotations through a
//! [`Searcher`] capability and decodes each matching line into a
//! [`TagMatch`](tagtrace_common::TagMatch). Text search itself is delegated:
//! [`RipgrepSearcher`] shells out to `rg --json`, and [`MemorySearcher`]
//! serves in-memory files for tests.
//!
//! A single malformed line, unreadable file, or failed search never fails
//! the caller; [`TagParser::search`] degrades to fewer matches plus
//! warnings.

#![warn(missing_docs)]

pub mod error;
pub mod grammar;
pub mod memory;
pub mod parser;
pub mod ripgrep;
pub mod searcher;

pub use error::SearchError;
pub use grammar::TagGrammar;
pub use memory::MemorySearcher;
pub use parser::{Availability, ParseOutcome, TagParser};
pub use ripgrep::RipgrepSearcher;
pub use searcher::{SearchHit, Searcher};

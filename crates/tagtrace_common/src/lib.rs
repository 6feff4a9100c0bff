//! Shared foundational types used across the tagtrace workspace.
//!
//! This crate provides the annotation tag record produced by the parser
//! ([`TagMatch`]), the graph node key ([`TagKey`]), the cache key of one
//! search ([`SearchKey`]), and [`InternalError`] for bugs.

#![warn(missing_docs)]

pub mod result;
pub mod search_key;
pub mod tag;

pub use result::{InternalError, Stage};
pub use search_key::SearchKey;
pub use tag::{TagKey, TagMatch};

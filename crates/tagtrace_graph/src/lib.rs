//! Structural validation of tag collections.
//!
//! Every check in this crate is a pure function of an immutable slice of
//! [`TagMatch`](tagtrace_common::TagMatch) values. Empty results mean "no
//! findings", never "no data". The only error is [`ValidationError`], raised
//! for structurally invalid input.
//!
//! # Checks
//!
//! - [`validate_primary_chain`]: does an identifier complete the Primary tier?
//! - [`detect_circular_references`]: elementary cycles in the reference graph
//! - [`find_orphaned_tags`]: tags nothing points to and that point nowhere
//! - [`validate_reference_integrity`]: references to tags that do not exist
//! - [`check_naming_consistency`]: identifiers outside `[A-Z0-9-]`
//! - [`calculate_tag_coverage`]: per-tier category presence
//!
//! [`Validator`] runs all of them in parallel over one snapshot.

#![warn(missing_docs)]

pub mod chain;
pub mod coverage;
pub mod cycles;
pub mod error;
pub mod graph;
pub mod naming;
pub mod orphans;
pub mod references;
pub mod suggest;
pub mod validator;

pub use chain::{validate_all_chains, validate_primary_chain, ChainType, ChainValidationResult};
pub use coverage::{calculate_tag_coverage, CoverageReport, TierCoverage};
pub use cycles::{detect_circular_references, find_cycles, Cycle, CycleSearch};
pub use error::ValidationError;
pub use graph::TagGraph;
pub use naming::{check_naming_consistency, is_valid_identifier, NamingViolation};
pub use orphans::{find_orphaned_tags, orphans_in};
pub use references::{
    validate_reference_integrity, ReferenceViolation, REFERENCE_MALFORMED, REFERENCE_MISSING,
};
pub use suggest::{
    levenshtein, normalize_identifier, suggest_naming_fix, suggest_reference_fix, Suggestion,
    SuggestionKind,
};
pub use validator::{ValidationOutcome, Validator};

//! Runs every check over one immutable snapshot.

use tagtrace_common::TagMatch;
use tagtrace_config::Taxonomy;

use crate::chain::{validate_all_chains, ChainValidationResult};
use crate::coverage::{calculate_tag_coverage, CoverageReport};
use crate::cycles::{find_cycles, CycleSearch};
use crate::error::{check_input, ValidationError};
use crate::graph::TagGraph;
use crate::naming::{check_naming_consistency, NamingViolation};
use crate::orphans::orphans_in;
use crate::references::{validate_reference_integrity, ReferenceViolation};
use crate::suggest::{suggest_naming_fix, suggest_reference_fix, Suggestion};

/// Results of all checks over one match set.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    /// The graph the checks ran on.
    pub graph: TagGraph,
    /// Chain results per identifier with at least one Primary tag.
    pub chain_results: Vec<ChainValidationResult>,
    /// Elementary cycles, possibly truncated.
    pub cycles: CycleSearch,
    /// Orphaned nodes.
    pub orphans: Vec<TagMatch>,
    /// Unresolved references.
    pub reference_violations: Vec<ReferenceViolation>,
    /// Badly named identifiers.
    pub naming_violations: Vec<NamingViolation>,
    /// Per-tier coverage.
    pub coverage: CoverageReport,
}

/// Structural validator configured with a taxonomy.
#[derive(Debug, Clone)]
pub struct Validator {
    taxonomy: Taxonomy,
    max_cycles: usize,
}

impl Validator {
    /// Creates a validator. `max_cycles` caps cycle enumeration.
    pub fn new(taxonomy: Taxonomy, max_cycles: usize) -> Self {
        Self {
            taxonomy,
            max_cycles,
        }
    }

    /// The taxonomy in use.
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Runs all checks. The graph checks and the per-tag checks run in
    /// parallel on the rayon pool.
    pub fn validate(&self, tags: &[TagMatch]) -> Result<ValidationOutcome, ValidationError> {
        check_input(tags)?;
        let graph = TagGraph::build(tags);
        let primary = &self.taxonomy.primary;

        let graph_checks = || {
            rayon::join(
                || find_cycles(&graph, self.max_cycles),
                || orphans_in(&graph),
            )
        };
        let tag_checks = || {
            rayon::join(
                || validate_reference_integrity(tags),
                || check_naming_consistency(tags),
            )
        };
        let summary_checks = || {
            rayon::join(
                || validate_all_chains(tags, primary),
                || calculate_tag_coverage(tags, &self.taxonomy),
            )
        };

        let (((cycles, orphans), (reference_violations, naming_violations)), summary) =
            rayon::join(|| rayon::join(graph_checks, tag_checks), summary_checks);
        let (chain_results, coverage) = summary;

        Ok(ValidationOutcome {
            graph,
            chain_results,
            cycles,
            orphans,
            reference_violations,
            naming_violations,
            coverage,
        })
    }

    /// Auto-correction suggestions for the naming and reference findings of
    /// an outcome, ordered by location.
    pub fn suggestions(&self, outcome: &ValidationOutcome) -> Vec<Suggestion> {
        let mut suggestions: Vec<Suggestion> = outcome
            .naming_violations
            .iter()
            .filter_map(suggest_naming_fix)
            .chain(
                outcome
                    .reference_violations
                    .iter()
                    .filter_map(|v| suggest_reference_fix(v, &outcome.graph)),
            )
            .collect();
        suggestions.sort_by(|a, b| {
            a.file
                .cmp(&b.file)
                .then(a.line.cmp(&b.line))
                .then_with(|| a.original.cmp(&b.original))
        });
        suggestions
    }
}

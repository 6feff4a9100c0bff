//! Primary chain completeness.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tagtrace_common::TagMatch;

/// Which chain definition a result was checked against.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChainType {
    /// The Primary tier, in taxonomy order.
    Primary,
}

/// Outcome of checking one identifier's chain.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ChainValidationResult {
    /// The identifier checked.
    pub identifier: String,
    /// `true` iff no chain category is missing.
    pub is_valid: bool,
    /// `present / required`, in `[0, 1]`.
    pub completeness_score: f64,
    /// Absent categories in chain order.
    pub missing_links: Vec<String>,
    /// The chain definition used.
    pub chain_type: ChainType,
}

/// Checks which Primary categories appear among the tags of one identifier.
///
/// `primary` is the Primary tier in canonical order. Tags of other
/// categories are ignored, as is whether they really carry `identifier`.
pub fn validate_primary_chain(
    identifier: &str,
    tags_for_identifier: &[TagMatch],
    primary: &[String],
) -> ChainValidationResult {
    let present: BTreeSet<&str> = tags_for_identifier
        .iter()
        .map(|t| t.category.as_str())
        .collect();
    let missing_links: Vec<String> = primary
        .iter()
        .filter(|c| !present.contains(c.as_str()))
        .cloned()
        .collect();
    let completeness_score = if primary.is_empty() {
        1.0
    } else {
        (primary.len() - missing_links.len()) as f64 / primary.len() as f64
    };
    ChainValidationResult {
        identifier: identifier.to_string(),
        is_valid: missing_links.is_empty(),
        completeness_score,
        missing_links,
        chain_type: ChainType::Primary,
    }
}

/// Checks the chain of every identifier carrying at least one Primary tag,
/// ordered by identifier.
pub fn validate_all_chains(tags: &[TagMatch], primary: &[String]) -> Vec<ChainValidationResult> {
    let mut by_identifier: BTreeMap<&str, Vec<TagMatch>> = BTreeMap::new();
    for tag in tags {
        by_identifier
            .entry(tag.identifier.as_str())
            .or_default()
            .push(tag.clone());
    }
    by_identifier
        .into_iter()
        .filter(|(_, group)| group.iter().any(|t| primary.contains(&t.category)))
        .map(|(identifier, group)| validate_primary_chain(identifier, &group, primary))
        .collect()
}

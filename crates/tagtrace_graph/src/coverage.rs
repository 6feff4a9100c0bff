//! Per-tier category coverage.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tagtrace_common::TagMatch;
use tagtrace_config::{Taxonomy, Tier};

/// Coverage of one tier.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct TierCoverage {
    /// `|present| / |defined|`, or 0.0 for a tier with no categories.
    pub coverage: f64,
    /// Categories of the tier seen at least once, in tier order.
    pub present: Vec<String>,
    /// Categories of the tier never seen, in tier order.
    pub missing: Vec<String>,
}

/// Coverage of every tier, plus observed categories outside the taxonomy.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Per-tier coverage, keyed by tier.
    pub tiers: BTreeMap<Tier, TierCoverage>,
    /// Categories seen in the scan that no tier defines, sorted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown_categories: Vec<String>,
}

impl CoverageReport {
    /// Coverage fraction of a tier, 0.0 if absent.
    pub fn coverage(&self, tier: Tier) -> f64 {
        self.tiers.get(&tier).map_or(0.0, |t| t.coverage)
    }
}

/// Computes `|categories present in tier| / |categories defined in tier|`
/// for each of the four tiers.
pub fn calculate_tag_coverage(tags: &[TagMatch], taxonomy: &Taxonomy) -> CoverageReport {
    let observed: BTreeSet<&str> = tags.iter().map(|t| t.category.as_str()).collect();

    let tiers = Tier::ALL
        .into_iter()
        .map(|tier| {
            let defined = taxonomy.categories(tier);
            let (present, missing): (Vec<String>, Vec<String>) = defined
                .iter()
                .cloned()
                .partition(|c| observed.contains(c.as_str()));
            let coverage = if defined.is_empty() {
                0.0
            } else {
                present.len() as f64 / defined.len() as f64
            };
            (
                tier,
                TierCoverage {
                    coverage,
                    present,
                    missing,
                },
            )
        })
        .collect();

    let unknown_categories = observed
        .into_iter()
        .filter(|c| taxonomy.tier_of(c).is_none())
        .map(str::to_string)
        .collect();

    CoverageReport {
        tiers,
        unknown_categories,
    }
}

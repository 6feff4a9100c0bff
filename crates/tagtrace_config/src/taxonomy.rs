//! Tag-category taxonomy: which categories exist and which tier each belongs to.
//!
//! Tier membership is configuration, not hard-coded logic. The validator
//! reads the Primary tier to define the chain every unit of work should
//! complete, and all four tiers to compute coverage.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One of the four category tiers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    /// Requirement, design, task, and test: the primary chain.
    Primary,
    /// Implementation artifacts (features, APIs, UI, data).
    Implementation,
    /// Steering documents (vision, structure, tech, ADRs).
    Steering,
    /// Quality concerns (performance, security, docs).
    Quality,
}

impl Tier {
    /// All tiers in canonical order.
    pub const ALL: [Tier; 4] = [
        Tier::Primary,
        Tier::Implementation,
        Tier::Steering,
        Tier::Quality,
    ];

    /// Returns the uppercase tier name used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Primary => "PRIMARY",
            Tier::Implementation => "IMPLEMENTATION",
            Tier::Steering => "STEERING",
            Tier::Quality => "QUALITY",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier membership for every known tag category.
///
/// Order within a tier is significant: the Primary tier's order is the
/// canonical order of `missing_links` in chain results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    /// Primary chain categories, in chain order.
    #[serde(default = "default_primary")]
    pub primary: Vec<String>,
    /// Implementation tier categories.
    #[serde(default = "default_implementation")]
    pub implementation: Vec<String>,
    /// Steering tier categories.
    #[serde(default = "default_steering")]
    pub steering: Vec<String>,
    /// Quality tier categories.
    #[serde(default = "default_quality")]
    pub quality: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_primary() -> Vec<String> {
    strings(&["REQUIREMENT", "DESIGN", "TASK", "TEST"])
}

fn default_implementation() -> Vec<String> {
    strings(&["FEATURE", "API", "UI", "DATA"])
}

fn default_steering() -> Vec<String> {
    strings(&["VISION", "STRUCTURE", "TECH", "ADR"])
}

fn default_quality() -> Vec<String> {
    strings(&["PERF", "SECURITY", "DOC", "TAG"])
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            implementation: default_implementation(),
            steering: default_steering(),
            quality: default_quality(),
        }
    }
}

impl Taxonomy {
    /// Returns the categories defined for a tier.
    pub fn categories(&self, tier: Tier) -> &[String] {
        match tier {
            Tier::Primary => &self.primary,
            Tier::Implementation => &self.implementation,
            Tier::Steering => &self.steering,
            Tier::Quality => &self.quality,
        }
    }

    /// Returns the tier a category belongs to, if it is known.
    pub fn tier_of(&self, category: &str) -> Option<Tier> {
        Tier::ALL
            .into_iter()
            .find(|&tier| self.categories(tier).iter().any(|c| c == category))
    }

    /// Returns every known category, tier by tier.
    pub fn all_categories(&self) -> impl Iterator<Item = &str> {
        Tier::ALL
            .into_iter()
            .flat_map(move |tier| self.categories(tier).iter().map(String::as_str))
    }

    /// Checks that categories are well-formed uppercase tokens, that no
    /// category belongs to two tiers, and that the Primary tier is non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.primary.is_empty() {
            return Err(ConfigError::InvalidTaxonomy(
                "the primary tier must define at least one category".to_string(),
            ));
        }
        let mut seen: Vec<(&str, Tier)> = Vec::new();
        for tier in Tier::ALL {
            for category in self.categories(tier) {
                if !is_category_token(category) {
                    return Err(ConfigError::InvalidTaxonomy(format!(
                        "category '{category}' in tier {tier} must match [A-Z][A-Z0-9_]*"
                    )));
                }
                if let Some((_, other)) = seen.iter().find(|(c, _)| c == category) {
                    return Err(ConfigError::InvalidTaxonomy(format!(
                        "category '{category}' appears in both {other} and {tier}"
                    )));
                }
                seen.push((category, tier));
            }
        }
        Ok(())
    }
}

/// Returns `true` if `s` is an uppercase category token `[A-Z][A-Z0-9_]*`.
pub fn is_category_token(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

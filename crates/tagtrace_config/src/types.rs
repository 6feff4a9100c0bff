//! Configuration types deserialized from `tagtrace.toml`.
//!
//! Every section is optional; a project with no configuration file at all
//! scans `src/`, `tests/`, and `docs/` for the default taxonomy.

use serde::{Deserialize, Serialize};

use crate::taxonomy::Taxonomy;

/// Placeholder in [`ScanConfig::pattern`] replaced by each taxonomy category.
pub const CATEGORY_PLACEHOLDER: &str = "{category}";

/// Top-level project configuration parsed from `tagtrace.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Project metadata.
    #[serde(default)]
    pub project: ProjectMeta,
    /// Tier membership for tag categories.
    #[serde(default)]
    pub taxonomy: Taxonomy,
    /// Which directories to scan and for what.
    #[serde(default)]
    pub scan: ScanConfig,
    /// Scan cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// External search primitive settings.
    #[serde(default)]
    pub search: SearchConfig,
    /// Graph analysis limits.
    #[serde(default)]
    pub graph: GraphConfig,
    /// Report scoring and finding policy.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Project metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectMeta {
    /// The project name, shown in summaries.
    #[serde(default)]
    pub name: String,
}

/// Scan surface configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Directories, relative to the project root, that bound the search.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    /// Tag prefix template. `{category}` expands once per taxonomy category;
    /// a template without the placeholder is searched literally.
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

fn default_scopes() -> Vec<String> {
    vec!["src".to_string(), "tests".to_string(), "docs".to_string()]
}

fn default_pattern() -> String {
    format!("@{CATEGORY_PLACEHOLDER}:")
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scopes: default_scopes(),
            pattern: default_pattern(),
        }
    }
}

impl ScanConfig {
    /// Expands the pattern template into the literal prefixes to search for.
    pub fn expand_patterns(&self, taxonomy: &Taxonomy) -> Vec<String> {
        if !self.pattern.contains(CATEGORY_PLACEHOLDER) {
            return vec![self.pattern.clone()];
        }
        taxonomy
            .all_categories()
            .map(|category| self.pattern.replace(CATEGORY_PLACEHOLDER, category))
            .collect()
    }
}

/// Scan cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache directory, relative to the project root.
    #[serde(default = "default_cache_dir")]
    pub dir: String,
    /// Maximum age of a cache entry in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_cache_dir() -> String {
    ".tagtrace".to_string()
}

fn default_ttl_secs() -> u64 {
    300
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

/// External search primitive settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Name or path of the search binary.
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Per-invocation timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum number of concurrent search invocations.
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,
}

fn default_binary() -> String {
    "rg".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_parallel() -> usize {
    4
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            timeout_secs: default_timeout_secs(),
            max_parallel: default_max_parallel(),
        }
    }
}

/// Graph analysis limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Maximum number of elementary cycles to enumerate.
    #[serde(default = "default_max_cycles")]
    pub max_cycles: usize,
}

fn default_max_cycles() -> usize {
    1000
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_cycles: default_max_cycles(),
        }
    }
}

/// Report scoring weights and finding policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Finding kinds to promote to error severity.
    #[serde(default)]
    pub deny: Vec<String>,
    /// Finding kinds to suppress entirely.
    #[serde(default)]
    pub allow: Vec<String>,
    /// Blend weights for the presentation-only overall score.
    #[serde(default)]
    pub weights: ScoreWeights,
}

/// Weights for the overall score blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight of Primary-tier traceability coverage.
    #[serde(default = "default_coverage_weight")]
    pub coverage: f64,
    /// Weight of the share of complete primary chains.
    #[serde(default = "default_integrity_weight")]
    pub integrity: f64,
    /// Weight of the average auto-correction confidence.
    #[serde(default = "default_confidence_weight")]
    pub confidence: f64,
}

fn default_coverage_weight() -> f64 {
    0.4
}

fn default_integrity_weight() -> f64 {
    0.3
}

fn default_confidence_weight() -> f64 {
    0.3
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            coverage: default_coverage_weight(),
            integrity: default_integrity_weight(),
            confidence: default_confidence_weight(),
        }
    }
}

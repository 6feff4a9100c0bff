//! The serializable report of one traceability run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tagtrace_common::TagMatch;
use tagtrace_config::{ReportConfig, ScoreWeights, Taxonomy, Tier};
use tagtrace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use tagtrace_graph::{
    ChainValidationResult, CoverageReport, Cycle, NamingViolation, ReferenceViolation, Suggestion,
    ValidationOutcome,
};

use crate::engine::FindingEngine;
use crate::error::ReportError;
use crate::fixes::FixIndex;
use crate::score::{average_confidence, chain_integrity, overall_score};
use crate::RuleContext;

/// Code for a degraded but completed run (search failures, cache trouble).
pub const TOOL_WARNING: DiagnosticCode = DiagnosticCode::new(Category::Tool, 501);

/// Code for a run that could not produce results.
pub const TOOL_FAILURE: DiagnosticCode = DiagnosticCode::new(Category::Tool, 502);

/// Overall outcome of a run.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// No warnings or errors.
    Success,
    /// Completed, with at least one warning or error.
    SuccessWithWarnings,
    /// The run could not complete.
    Failed,
}

impl RunStatus {
    /// Process exit code for this status.
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Success => 0,
            RunStatus::SuccessWithWarnings => 1,
            RunStatus::Failed => 2,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::SuccessWithWarnings => "success with warnings",
            RunStatus::Failed => "failed",
        }
    }
}

/// A cycle as it appears in the report.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ReportedCycle {
    /// `A -> B -> A` rendering.
    pub description: String,
    /// First occurrence of each participating node.
    pub nodes: Vec<TagMatch>,
}

impl From<&Cycle> for ReportedCycle {
    fn from(cycle: &Cycle) -> Self {
        Self {
            description: cycle.describe(),
            nodes: cycle.nodes.clone(),
        }
    }
}

/// Everything produced by one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraceReport {
    /// When the report was assembled.
    pub timestamp: DateTime<Utc>,
    /// Project name from the configuration.
    pub project: String,
    /// Overall outcome.
    pub status: RunStatus,
    /// Search tool and version, when it was available.
    pub search_tool: Option<String>,
    /// Number of tag occurrences scanned.
    pub total_tags: usize,
    /// Primary tier coverage as a percentage.
    pub traceability_percentage: f64,
    /// Chain results per identifier.
    pub chain_results: Vec<ChainValidationResult>,
    /// Elementary reference cycles.
    pub cycles: Vec<ReportedCycle>,
    /// `true` if cycle enumeration hit its limit.
    #[serde(default)]
    pub cycles_truncated: bool,
    /// Orphaned tags.
    pub orphans: Vec<TagMatch>,
    /// Unresolved references.
    pub reference_violations: Vec<ReferenceViolation>,
    /// Identifier naming violations.
    pub naming_violations: Vec<NamingViolation>,
    /// Per-tier coverage.
    pub coverage: CoverageReport,
    /// Auto-correction suggestions.
    pub suggestions: Vec<Suggestion>,
    /// Findings as diagnostics, by location.
    pub diagnostics: Vec<Diagnostic>,
    /// Degraded-path messages from the run itself.
    pub warnings: Vec<String>,
    /// Files that changed since the previous run, relative to the root.
    pub changed_files: Vec<PathBuf>,
    /// Number of reported findings, excluding tool warnings.
    pub total_issues: usize,
    /// Error-severity diagnostics.
    pub error_count: usize,
    /// Warning-severity diagnostics.
    pub warning_count: usize,
    /// Blend of coverage, chain integrity, and suggestion confidence.
    pub overall_score: f64,
    /// Wall-clock duration of the run in seconds.
    pub elapsed_time: f64,
}

impl TraceReport {
    /// A report for a run that could not scan at all.
    pub fn failed(project: impl Into<String>, reason: impl Into<String>, elapsed: Duration) -> Self {
        let reason = reason.into();
        Self {
            timestamp: Utc::now(),
            project: project.into(),
            status: RunStatus::Failed,
            search_tool: None,
            total_tags: 0,
            traceability_percentage: 0.0,
            chain_results: Vec::new(),
            cycles: Vec::new(),
            cycles_truncated: false,
            orphans: Vec::new(),
            reference_violations: Vec::new(),
            naming_violations: Vec::new(),
            coverage: CoverageReport::default(),
            suggestions: Vec::new(),
            diagnostics: vec![Diagnostic::error(TOOL_FAILURE, reason.clone())],
            warnings: vec![reason],
            changed_files: Vec::new(),
            total_issues: 0,
            error_count: 1,
            warning_count: 0,
            overall_score: 0.0,
            elapsed_time: elapsed.as_secs_f64(),
        }
    }

    /// Returns `true` if any error-severity diagnostic was reported.
    pub fn has_blocking_issues(&self) -> bool {
        self.error_count > 0
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes pretty-printed JSON to `path`.
    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        let json = self.to_json_pretty()?;
        std::fs::write(path, json).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Run data the generator does not compute itself.
pub struct ReportInputs<'a> {
    /// Project name.
    pub project: &'a str,
    /// Search tool and version.
    pub search_tool: Option<String>,
    /// Number of tag occurrences scanned.
    pub total_tags: usize,
    /// Validator results.
    pub outcome: &'a ValidationOutcome,
    /// Suggestions for the outcome.
    pub suggestions: &'a [Suggestion],
    /// Degraded-path messages collected during the run.
    pub warnings: Vec<String>,
    /// Changed files, relative to the root.
    pub changed_files: Vec<PathBuf>,
    /// Time spent so far.
    pub elapsed: Duration,
}

/// Assembles [`TraceReport`]s under one report policy.
pub struct ReportGenerator {
    engine: FindingEngine,
    weights: ScoreWeights,
    primary: Vec<String>,
}

impl ReportGenerator {
    /// Creates a generator for a report policy and taxonomy.
    pub fn new(config: &ReportConfig, taxonomy: &Taxonomy) -> Self {
        Self {
            engine: FindingEngine::new(config),
            weights: config.weights,
            primary: taxonomy.primary.clone(),
        }
    }

    /// The finding engine in use.
    pub fn engine(&self) -> &FindingEngine {
        &self.engine
    }

    /// Builds the report. `line_text` supplies source lines for fix
    /// replacements and may return `None` for unreadable lines.
    pub fn generate<F>(&self, inputs: ReportInputs<'_>, line_text: F) -> TraceReport
    where
        F: FnMut(&Path, u32) -> Option<String>,
    {
        let outcome = inputs.outcome;
        let fixes = FixIndex::build(inputs.suggestions, line_text);
        let ctx = RuleContext {
            outcome,
            primary: &self.primary,
            fixes: &fixes,
        };

        let sink = DiagnosticSink::new();
        let total_issues = self.engine.run(&ctx, &sink);

        let mut warnings = inputs.warnings;
        warnings.extend(
            self.engine
                .unknown_policy_entries()
                .into_iter()
                .map(|entry| format!("unknown finding kind `{entry}` in [report] deny/allow")),
        );
        for warning in &warnings {
            sink.emit(Diagnostic::warning(TOOL_WARNING, warning.clone()));
        }

        let error_count = sink.count(Severity::Error);
        let warning_count = sink.count(Severity::Warning);
        let status = match sink.worst() {
            Some(worst) if worst.affects_status() => RunStatus::SuccessWithWarnings,
            _ => RunStatus::Success,
        };

        let primary_coverage = outcome.coverage.coverage(Tier::Primary);
        let overall_score = overall_score(
            &self.weights,
            primary_coverage,
            chain_integrity(&outcome.chain_results),
            average_confidence(inputs.suggestions),
        );

        TraceReport {
            timestamp: Utc::now(),
            project: inputs.project.to_string(),
            status,
            search_tool: inputs.search_tool,
            total_tags: inputs.total_tags,
            traceability_percentage: primary_coverage * 100.0,
            chain_results: outcome.chain_results.clone(),
            cycles: outcome.cycles.cycles.iter().map(ReportedCycle::from).collect(),
            cycles_truncated: outcome.cycles.truncated,
            orphans: outcome.orphans.clone(),
            reference_violations: outcome.reference_violations.clone(),
            naming_violations: outcome.naming_violations.clone(),
            coverage: outcome.coverage.clone(),
            suggestions: inputs.suggestions.to_vec(),
            diagnostics: sink.take_sorted(),
            warnings,
            changed_files: inputs.changed_files,
            total_issues,
            error_count,
            warning_count,
            overall_score,
            elapsed_time: inputs.elapsed.as_secs_f64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::tag_at;
    use pretty_assertions::assert_eq;
    use tagtrace_graph::Validator;

    fn generate(tags: &[TagMatch], config: &ReportConfig, warnings: Vec<String>) -> TraceReport {
        let taxonomy = Taxonomy::default();
        let validator = Validator::new(taxonomy.clone(), 100);
        let outcome = validator.validate(tags).unwrap();
        let suggestions = validator.suggestions(&outcome);
        ReportGenerator::new(config, &taxonomy).generate(
            ReportInputs {
                project: "demo",
                search_tool: Some("ripgrep 14.1.0".to_string()),
                total_tags: tags.len(),
                outcome: &outcome,
                suggestions: &suggestions,
                warnings,
                changed_files: vec![PathBuf::from("src/a.rs")],
                elapsed: Duration::from_millis(250),
            },
            |_, _| None,
        )
    }

    fn full_chain(identifier: &str) -> Vec<TagMatch> {
        ["REQUIREMENT", "DESIGN", "TASK", "TEST"]
            .iter()
            .enumerate()
            .map(|(i, c)| tag_at(c, identifier, "src/a.rs", i as u32 + 1, &[]))
            .collect()
    }

    #[test]
    fn clean_run_is_success() {
        let report = generate(&full_chain("AUTH-100"), &ReportConfig::default(), Vec::new());
        assert_eq!(report.status, RunStatus::Success);
        assert_eq!(report.traceability_percentage, 100.0);
        assert_eq!(report.total_issues, 0);
        assert!(report.diagnostics.is_empty());
        assert!((report.overall_score - 1.0).abs() < 1e-9);
        assert_eq!(report.elapsed_time, 0.25);
        assert_eq!(report.status.exit_code(), 0);
    }

    #[test]
    fn missing_link_is_a_warning() {
        let mut tags = full_chain("AUTH-100");
        tags.retain(|t| t.category != "DESIGN");
        let report = generate(&tags, &ReportConfig::default(), Vec::new());
        assert_eq!(report.status, RunStatus::SuccessWithWarnings);
        assert_eq!(report.chain_results[0].missing_links, vec!["DESIGN".to_string()]);
        // W201 and V401
        assert_eq!(report.total_issues, 2);
        assert_eq!(report.warning_count, 2);
        assert_eq!(report.traceability_percentage, 75.0);
    }

    #[test]
    fn tool_warnings_become_diagnostics() {
        let report = generate(
            &full_chain("AUTH-100"),
            &ReportConfig::default(),
            vec!["search of docs timed out".to_string()],
        );
        assert_eq!(report.status, RunStatus::SuccessWithWarnings);
        assert_eq!(report.total_issues, 0);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].code, TOOL_WARNING);
    }

    #[test]
    fn orphan_note_alone_stays_success() {
        let mut tags = full_chain("AUTH-100");
        tags.push(tag_at("DOC", "GUIDE", "docs/g.md", 1, &[]));
        let report = generate(&tags, &ReportConfig::default(), Vec::new());
        assert_eq!(report.orphans.len(), 1);
        assert_eq!(report.total_issues, 1);
        assert_eq!(report.status, RunStatus::Success);
        assert_eq!(report.diagnostics[0].code.to_string(), "W202");
    }

    #[test]
    fn unknown_policy_entry_warns() {
        let config = ReportConfig {
            deny: vec!["nope".to_string()],
            ..ReportConfig::default()
        };
        let report = generate(&full_chain("A"), &config, Vec::new());
        assert_eq!(
            report.warnings,
            vec!["unknown finding kind `nope` in [report] deny/allow".to_string()]
        );
    }

    #[test]
    fn cycles_are_described() {
        let tags = vec![
            tag_at("TASK", "A", "a.rs", 1, &["TASK:B"]),
            tag_at("TASK", "B", "b.rs", 1, &["TASK:A"]),
        ];
        let report = generate(&tags, &ReportConfig::default(), Vec::new());
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.cycles[0].description, "TASK:A -> TASK:B -> TASK:A");
        assert!(report.has_blocking_issues());
    }

    #[test]
    fn failed_report() {
        let report = TraceReport::failed("demo", "ripgrep not found", Duration::from_secs(1));
        assert_eq!(report.status, RunStatus::Failed);
        assert_eq!(report.status.exit_code(), 2);
        assert_eq!(report.diagnostics[0].code, TOOL_FAILURE);
    }

    #[test]
    fn json_output_shape() {
        let report = generate(&full_chain("A"), &ReportConfig::default(), Vec::new());
        let json = report.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["traceability_percentage"], 100.0);
        let back: TraceReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status, report.status);
        assert_eq!(back.chain_results, report.chain_results);
    }

    #[test]
    fn write_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        TraceReport::failed("demo", "x", Duration::ZERO)
            .write_json(&path)
            .unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"failed\""));
    }
}

//! Report assembly for a traceability run.
//!
//! Validator findings are turned into [`Diagnostic`](tagtrace_diagnostics::Diagnostic)s
//! by a registry of [`ReportRule`]s. Each rule has a diagnostic code, a short
//! kebab-case name, and a default severity; the `[report]` deny and allow
//! lists promote rules to errors or silence them by name or code.
//!
//! # Rule Categories
//!
//! - **E-series (errors):** broken references, circular references
//! - **W-series (warnings):** incomplete chains, orphaned tags
//! - **C-series (conventions):** identifier naming
//! - **V-series (coverage):** Primary tier coverage below 100%
//! - **S-series (tool):** search and persistence problems raised by the run itself

#![warn(missing_docs)]

mod engine;
mod error;
mod fixes;
mod report;
mod rules;
mod score;
mod summary;

pub use engine::FindingEngine;
pub use error::ReportError;
pub use fixes::{to_suggested_fix, FixIndex};
pub use report::{
    ReportGenerator, ReportInputs, ReportedCycle, RunStatus, TraceReport, TOOL_FAILURE, TOOL_WARNING,
};
pub use rules::register_builtin_rules;
pub use rules::{
    BrokenReference, CircularReference, IncompleteChain, LowCoverage, NamingConvention,
    OrphanedTag,
};
pub use score::{average_confidence, chain_integrity, overall_score};
pub use summary::render_summary;

use tagtrace_diagnostics::{DiagnosticCode, DiagnosticSink, Severity};
use tagtrace_graph::ValidationOutcome;

/// Everything a rule may look at.
pub struct RuleContext<'a> {
    /// Validator results for the run.
    pub outcome: &'a ValidationOutcome,
    /// Primary tier categories in chain order.
    pub primary: &'a [String],
    /// Suggested fixes, looked up by the text they replace.
    pub fixes: &'a FixIndex,
}

/// A single report rule that turns one kind of finding into diagnostics.
///
/// Rules emit at their default severity; the [`FindingEngine`] applies the
/// configured deny and allow lists afterwards.
pub trait ReportRule: Send + Sync {
    /// Returns the diagnostic code for this rule (e.g., E101, W202).
    fn code(&self) -> DiagnosticCode;

    /// Returns the short kebab-case name of this rule (e.g., "orphaned-tag").
    fn name(&self) -> &str;

    /// Returns a human-readable description of what this rule reports.
    fn description(&self) -> &str;

    /// Returns the default severity for diagnostics emitted by this rule.
    fn default_severity(&self) -> Severity;

    /// Emits one diagnostic per finding of this kind.
    fn check(&self, ctx: &RuleContext<'_>, sink: &DiagnosticSink);
}

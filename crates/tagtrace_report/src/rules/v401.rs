//! V401: Primary tier coverage below 100%.

use tagtrace_config::Tier;
use tagtrace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};

use crate::{ReportRule, RuleContext};

/// Reports Primary tier categories that never appear in the scan.
pub struct LowCoverage;

impl ReportRule for LowCoverage {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Coverage, 401)
    }

    fn name(&self) -> &str {
        "low-coverage"
    }

    fn description(&self) -> &str {
        "primary tier categories are missing from the project"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &DiagnosticSink) {
        let coverage = &ctx.outcome.coverage;
        let Some(primary) = coverage.tiers.get(&Tier::Primary) else {
            return;
        };
        if primary.missing.is_empty() {
            return;
        }
        let mut diag = Diagnostic::new(
            self.default_severity(),
            self.code(),
            format!(
                "{} tier coverage is {:.0}%",
                Tier::Primary.as_str(),
                primary.coverage * 100.0
            ),
        )
        .with_note(format!("no tags found for {}", primary.missing.join(", ")));
        if !coverage.unknown_categories.is_empty() {
            diag = diag.with_help(format!(
                "categories outside the taxonomy: {}",
                coverage.unknown_categories.join(", ")
            ));
        }
        sink.emit(diag);
    }
}

//! E101: Broken reference.

use tagtrace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Location, Severity};

use crate::{ReportRule, RuleContext};

/// Reports every reference that does not resolve to a scanned tag.
pub struct BrokenReference;

impl ReportRule for BrokenReference {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Integrity, 101)
    }

    fn name(&self) -> &str {
        "broken-reference"
    }

    fn description(&self) -> &str {
        "reference to a tag that does not exist"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &DiagnosticSink) {
        for violation in &ctx.outcome.reference_violations {
            let mut diag = Diagnostic::new(
                self.default_severity(),
                self.code(),
                format!(
                    "reference `{}` from @{}:{} does not resolve",
                    violation.broken_reference, violation.source_category, violation.source_identifier
                ),
            )
            .at(Location::new(violation.file.clone(), violation.line))
            .with_note(violation.reason.clone());
            if let Some(fix) = ctx
                .fixes
                .get(&violation.file, violation.line, &violation.broken_reference)
            {
                diag = diag.with_fix(fix.clone());
            }
            sink.emit(diag);
        }
    }
}

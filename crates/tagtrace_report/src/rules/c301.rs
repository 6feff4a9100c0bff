//! C301: Identifier naming convention.

use tagtrace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Location, Severity};

use crate::{ReportRule, RuleContext};

/// Reports identifiers that are not uppercase letters, digits, and hyphens.
pub struct NamingConvention;

impl ReportRule for NamingConvention {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Convention, 301)
    }

    fn name(&self) -> &str {
        "naming-violation"
    }

    fn description(&self) -> &str {
        "identifier violates the naming convention"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &DiagnosticSink) {
        for violation in &ctx.outcome.naming_violations {
            let token = format!("@{}:{}", violation.category, violation.identifier);
            let mut diag = Diagnostic::new(self.default_severity(), self.code(), violation.message.clone())
                .at(Location::new(violation.file.clone(), violation.line));
            if let Some(fix) = ctx.fixes.get(&violation.file, violation.line, &token) {
                diag = diag.with_fix(fix.clone());
            }
            sink.emit(diag);
        }
    }
}

//! W202: Orphaned tag.

use tagtrace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Location, Severity};

use crate::{ReportRule, RuleContext};

/// Reports tags with no references, no referrers, and no chain siblings.
pub struct OrphanedTag;

impl ReportRule for OrphanedTag {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Chain, 202)
    }

    fn name(&self) -> &str {
        "orphaned-tag"
    }

    fn description(&self) -> &str {
        "tag is not linked to any other tag"
    }

    fn default_severity(&self) -> Severity {
        Severity::Note
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &DiagnosticSink) {
        for orphan in &ctx.outcome.orphans {
            sink.emit(
                Diagnostic::new(
                    self.default_severity(),
                    self.code(),
                    format!("tag {} is not linked to any other tag", orphan.token()),
                )
                .at(Location::new(orphan.file.clone(), orphan.line))
                .with_help("reference it from a related tag or add the rest of its chain"),
            );
        }
    }
}

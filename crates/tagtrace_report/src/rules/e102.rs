//! E102: Circular reference.

use tagtrace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Location, Severity};

use crate::{ReportRule, RuleContext};

/// Reports each elementary reference cycle once, at its first node.
pub struct CircularReference;

impl ReportRule for CircularReference {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Integrity, 102)
    }

    fn name(&self) -> &str {
        "circular-reference"
    }

    fn description(&self) -> &str {
        "tags that reference each other in a loop"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &DiagnosticSink) {
        let search = &ctx.outcome.cycles;
        for cycle in &search.cycles {
            let mut diag = Diagnostic::new(
                self.default_severity(),
                self.code(),
                format!("circular reference: {}", cycle.describe()),
            );
            if let Some(first) = cycle.nodes.first() {
                diag = diag.at(Location::new(first.file.clone(), first.line));
            }
            for node in cycle.nodes.iter().skip(1) {
                diag = diag.with_note(format!("{} at {}", node.key(), node.location()));
            }
            sink.emit(diag.with_help("remove one of the references to break the loop"));
        }
        if search.truncated {
            sink.emit(Diagnostic::new(
                Severity::Note,
                self.code(),
                format!(
                    "cycle enumeration stopped after {} cycles; more may exist",
                    search.cycles.len()
                ),
            ));
        }
    }
}

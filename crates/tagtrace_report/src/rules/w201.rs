//! W201: Incomplete chain.

use tagtrace_common::{TagKey, TagMatch};
use tagtrace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Location, Severity};

use crate::{ReportRule, RuleContext};

/// Reports identifiers whose Primary chain is missing links.
pub struct IncompleteChain;

impl ReportRule for IncompleteChain {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Chain, 201)
    }

    fn name(&self) -> &str {
        "incomplete-chain"
    }

    fn description(&self) -> &str {
        "identifier is missing categories of the primary chain"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &DiagnosticSink) {
        let graph = &ctx.outcome.graph;
        for result in ctx.outcome.chain_results.iter().filter(|r| !r.is_valid) {
            let mut diag = Diagnostic::new(
                self.default_severity(),
                self.code(),
                format!(
                    "traceability chain for `{}` is incomplete: missing {}",
                    result.identifier,
                    result.missing_links.join(", ")
                ),
            )
            .with_note(format!(
                "chain is {:.0}% complete",
                result.completeness_score * 100.0
            ));

            // Anchor at the earliest Primary occurrence of the identifier.
            let anchor = ctx
                .primary
                .iter()
                .filter_map(|category| {
                    graph.representative(&TagKey::new(category, &result.identifier))
                })
                .min_by(|a, b| TagMatch::cmp_location(a, b));
            if let Some(tag) = anchor {
                diag = diag.at(Location::new(tag.file.clone(), tag.line));
            }
            sink.emit(diag);
        }
    }
}

//! Human-readable run summary.

use std::fmt::Write;

use tagtrace_config::Tier;
use tagtrace_diagnostics::DiagnosticRenderer;

use crate::report::TraceReport;

/// Renders the diagnostics of `report` followed by a summary block.
pub fn render_summary(report: &TraceReport, renderer: &dyn DiagnosticRenderer) -> String {
    let mut out = String::new();
    for diag in &report.diagnostics {
        out.push_str(&renderer.render(diag));
        out.push('\n');
    }

    let project = if report.project.is_empty() {
        "project"
    } else {
        report.project.as_str()
    };
    let _ = writeln!(out, "Traceability report for {project}");
    let _ = writeln!(out, "  status:         {}", report.status.label());
    if let Some(tool) = &report.search_tool {
        let _ = writeln!(out, "  search tool:    {tool}");
    }
    let _ = writeln!(
        out,
        "  tags scanned:   {} ({} files changed since last scan)",
        report.total_tags,
        report.changed_files.len()
    );
    let _ = writeln!(out, "  traceability:   {:.1}%", report.traceability_percentage);

    let complete = report.chain_results.iter().filter(|c| c.is_valid).count();
    let _ = writeln!(
        out,
        "  chains:         {complete}/{} complete",
        report.chain_results.len()
    );
    let truncated = if report.cycles_truncated { "+" } else { "" };
    let _ = writeln!(
        out,
        "  findings:       {} cycles{truncated}, {} orphans, {} broken references, {} naming violations",
        report.cycles.len(),
        report.orphans.len(),
        report.reference_violations.len(),
        report.naming_violations.len()
    );

    let tiers: Vec<String> = Tier::ALL
        .into_iter()
        .map(|tier| {
            format!(
                "{} {:.0}%",
                tier.as_str(),
                report.coverage.coverage(tier) * 100.0
            )
        })
        .collect();
    let _ = writeln!(out, "  coverage:       {}", tiers.join(" | "));
    let _ = writeln!(
        out,
        "  issues:         {} ({} errors, {} warnings)",
        report.total_issues, report.error_count, report.warning_count
    );
    if !report.suggestions.is_empty() {
        let _ = writeln!(out, "  suggestions:    {}", report.suggestions.len());
    }
    let _ = writeln!(out, "  overall score:  {:.2}", report.overall_score);
    let _ = writeln!(out, "  elapsed:        {:.2}s", report.elapsed_time);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tagtrace_diagnostics::TerminalRenderer;

    #[test]
    fn failed_report_summary() {
        let report = TraceReport::failed("demo", "search tool `rg` is not available", Duration::ZERO);
        let text = render_summary(&report, &TerminalRenderer::new(false));
        assert!(text.starts_with("error[S502]: search tool `rg` is not available\n"));
        assert!(text.contains("Traceability report for demo"));
        assert!(text.contains("  status:         failed\n"));
        assert!(text.contains("PRIMARY 0% | IMPLEMENTATION 0% | STEERING 0% | QUALITY 0%"));
    }

    #[test]
    fn unnamed_project() {
        let report = TraceReport::failed("", "x", Duration::ZERO);
        let text = render_summary(&report, &TerminalRenderer::new(false));
        assert!(text.contains("Traceability report for project\n"));
    }
}

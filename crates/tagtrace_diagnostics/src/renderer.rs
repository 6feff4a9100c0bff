//! Diagnostic rendering for human-readable output.

use crate::diagnostic::Diagnostic;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[E101]: reference `DESIGN:AUTH-101` does not resolve
///   --> src/auth.rs:12
///    = note: Referenced tag does not exist
///    = help: did you mean `DESIGN:AUTH-100`? (confidence 0.88)
///    |  - // @TASK:AUTH-100 implements DESIGN:AUTH-101
///    |  + // @TASK:AUTH-100 implements DESIGN:AUTH-100
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, ansi: &str) -> String {
        if self.color {
            format!("\x1b[{ansi}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();

        let header = format!("{}[{}]", diag.severity, diag.code);
        out.push_str(&format!(
            "{}: {}\n",
            self.paint(&header, diag.severity.ansi_style()),
            diag.message
        ));

        if let Some(location) = &diag.location {
            out.push_str(&format!("  --> {location}\n"));
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }

        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        if let Some(fix) = &diag.fix {
            out.push_str(&format!(
                "   = help: {} (confidence {:.2})\n",
                fix.message, fix.confidence
            ));
            if let Some(rep) = &fix.replacement {
                out.push_str(&format!("   |  - {}\n", rep.old_text.trim_end()));
                out.push_str(&format!("   |  + {}\n", rep.new_text.trim_end()));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};
    use crate::location::Location;
    use crate::suggested_fix::{Replacement, SuggestedFix};

    #[test]
    fn render_error_with_location() {
        let code = DiagnosticCode::new(Category::Integrity, 101);
        let diag = Diagnostic::error(code, "reference `DESIGN:X-1` does not resolve")
            .at(Location::new("src/a.rs", 12))
            .with_note("Referenced tag does not exist");

        let output = TerminalRenderer::new(false).render(&diag);
        assert!(output.contains("error[E101]: reference `DESIGN:X-1` does not resolve"));
        assert!(output.contains("--> src/a.rs:12"));
        assert!(output.contains("= note: Referenced tag does not exist"));
    }

    #[test]
    fn render_project_wide_has_no_arrow() {
        let code = DiagnosticCode::new(Category::Coverage, 401);
        let diag = Diagnostic::warning(code, "PRIMARY coverage is 75%");
        let output = TerminalRenderer::new(false).render(&diag);
        assert!(output.starts_with("warning[V401]"));
        assert!(!output.contains("-->"));
    }

    #[test]
    fn render_fix_with_replacement() {
        let code = DiagnosticCode::new(Category::Convention, 301);
        let fix = SuggestedFix::new("rename to `AUTH-2`", 0.9).with_replacement(Replacement {
            location: Location::new("a.rs", 1),
            old_text: "// @TEST:auth-2".to_string(),
            new_text: "// @TEST:AUTH-2".to_string(),
        });
        let diag = Diagnostic::warning(code, "bad name").with_fix(fix);
        let output = TerminalRenderer::new(false).render(&diag);
        assert!(output.contains("rename to `AUTH-2` (confidence 0.90)"));
        assert!(output.contains("|  - // @TEST:auth-2"));
        assert!(output.contains("|  + // @TEST:AUTH-2"));
    }

    #[test]
    fn color_wraps_header() {
        let code = DiagnosticCode::new(Category::Integrity, 102);
        let output = TerminalRenderer::new(true).render(&Diagnostic::error(code, "cycle"));
        assert!(output.starts_with("\x1b[1;31merror[E102]\x1b[0m"));
    }
}

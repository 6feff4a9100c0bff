//! One reportable finding.

use crate::code::DiagnosticCode;
use crate::location::Location;
use crate::severity::Severity;
use crate::suggested_fix::SuggestedFix;
use serde::{Deserialize, Serialize};

/// A finding about the tag graph, or a problem with the search tool. Tag
/// findings carry the tag's location; project-wide ones do not.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// How much it matters.
    pub severity: Severity,
    /// Which rule produced it.
    pub code: DiagnosticCode,
    /// One-line summary.
    pub message: String,
    /// Offending tag, or `None` for project-wide findings.
    pub location: Option<Location>,
    /// Extra context lines.
    pub notes: Vec<String>,
    /// What the user could do about it.
    pub help: Vec<String>,
    /// Machine-applicable correction.
    pub fix: Option<SuggestedFix>,
}

impl Diagnostic {
    /// A finding with no location or extras yet.
    pub fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            location: None,
            notes: Vec::new(),
            help: Vec::new(),
            fix: None,
        }
    }

    /// Shorthand for [`Severity::Error`].
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Shorthand for [`Severity::Warning`].
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Pins the finding to a tag.
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Appends to [`Diagnostic::notes`].
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Appends to [`Diagnostic::help`].
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    /// Attaches a correction.
    pub fn with_fix(mut self, fix: SuggestedFix) -> Self {
        self.fix = Some(fix);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;

    #[test]
    fn project_wide_finding_has_no_location() {
        let diag = Diagnostic::warning(
            DiagnosticCode::new(Category::Coverage, 401),
            "PRIMARY tier coverage is 50%",
        );
        assert_eq!(diag.severity, Severity::Warning);
        assert!(diag.location.is_none());
    }

    #[test]
    fn broken_reference_with_context() {
        let code = DiagnosticCode::new(Category::Integrity, 101);
        let diag = Diagnostic::error(code, "`DESIGN:AUTH-10O` not found")
            .at(Location::new("src/auth.rs", 12))
            .with_note("referenced from @TASK:AUTH-100")
            .with_fix(SuggestedFix::new("did you mean `DESIGN:AUTH-100`?", 0.875));
        assert_eq!(diag.location.as_ref().map(|l| l.line), Some(12));
        assert_eq!(diag.notes, vec!["referenced from @TASK:AUTH-100"]);
        assert!(diag.help.is_empty());
        assert_eq!(diag.fix.map(|f| f.confidence), Some(0.875));
    }

    #[test]
    fn json_uses_code_string() {
        let diag = Diagnostic::error(DiagnosticCode::new(Category::Integrity, 102), "cycle")
            .with_help("break the cycle");
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["code"], "E102");
        assert_eq!(json["severity"], "error");
    }
}

//! How much a finding matters to the run status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight of a finding. Variants are ordered from mildest to blocking, so
/// `max()` over a report gives its worst finding.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Suggestion only.
    Help,
    /// Worth knowing but not a problem, e.g. a documentation tag nothing
    /// links to.
    Note,
    /// Degrades the run to success-with-warnings.
    Warning,
    /// Broken traceability.
    Error,
}

impl Severity {
    /// Lowercase label, as written in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Help => "help",
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Whether a finding of this weight keeps a run from plain success.
    pub fn affects_status(self) -> bool {
        self >= Severity::Warning
    }

    /// ANSI SGR style for the terminal header.
    pub(crate) fn ansi_style(self) -> &'static str {
        match self {
            Severity::Error => "1;31",
            Severity::Warning => "1;33",
            Severity::Note | Severity::Help => "1;36",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

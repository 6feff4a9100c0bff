//! Auto-correction suggestions attached to diagnostics.

use serde::{Deserialize, Serialize};

use crate::location::Location;

/// A suggested correction with the confidence that it is what the author meant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuggestedFix {
    /// A human-readable description of the fix (e.g., "rename to `AUTH-002`").
    pub message: String,
    /// The concrete line rewrite, when the source line could be read.
    pub replacement: Option<Replacement>,
    /// Confidence in `[0, 1]` that applying the fix is correct.
    pub confidence: f64,
}

/// A whole-line replacement at a given location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Replacement {
    /// The line being rewritten.
    pub location: Location,
    /// The current text of the line.
    pub old_text: String,
    /// The text to substitute.
    pub new_text: String,
}

impl SuggestedFix {
    /// Creates a fix without a concrete replacement. Confidence is clamped
    /// into `[0, 1]`.
    pub fn new(message: impl Into<String>, confidence: f64) -> Self {
        Self {
            message: message.into(),
            replacement: None,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Attaches a line replacement.
    pub fn with_replacement(mut self, replacement: Replacement) -> Self {
        self.replacement = Some(replacement);
        self
    }
}

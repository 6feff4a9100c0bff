//! Turns validator suggestions into diagnostic fixes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tagtrace_diagnostics::{Location, Replacement, SuggestedFix};
use tagtrace_graph::Suggestion;

/// Converts a suggestion into a fix, rewriting `line_text` when it contains
/// the text being replaced.
pub fn to_suggested_fix(suggestion: &Suggestion, line_text: Option<&str>) -> SuggestedFix {
    let fix = SuggestedFix::new(suggestion.message.clone(), suggestion.confidence);
    match line_text {
        Some(text) if text.contains(&suggestion.original) => fix.with_replacement(Replacement {
            location: Location::new(suggestion.file.clone(), suggestion.line),
            old_text: text.to_string(),
            new_text: text.replacen(&suggestion.original, &suggestion.replacement, 1),
        }),
        _ => fix,
    }
}

type FixKey = (PathBuf, u32, String);

/// Suggested fixes keyed by `(file, line, replaced text)`.
#[derive(Debug, Default)]
pub struct FixIndex {
    fixes: HashMap<FixKey, SuggestedFix>,
}

impl FixIndex {
    /// Builds the index. `line_text` returns the current text of a source
    /// line, or `None` when it cannot be read; such fixes carry no
    /// replacement.
    pub fn build<F>(suggestions: &[Suggestion], mut line_text: F) -> Self
    where
        F: FnMut(&Path, u32) -> Option<String>,
    {
        let fixes = suggestions
            .iter()
            .map(|s| {
                let text = line_text(&s.file, s.line);
                (
                    (s.file.clone(), s.line, s.original.clone()),
                    to_suggested_fix(s, text.as_deref()),
                )
            })
            .collect();
        Self { fixes }
    }

    /// Looks up the fix replacing `original` on `file:line`.
    pub fn get(&self, file: &Path, line: u32, original: &str) -> Option<&SuggestedFix> {
        self.fixes
            .get(&(file.to_path_buf(), line, original.to_string()))
    }

    /// Number of indexed fixes.
    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    /// Returns `true` if there are no fixes.
    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }
}

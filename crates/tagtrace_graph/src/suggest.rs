//! Auto-correction suggestions for naming and reference findings.
//!
//! Suggestions are advisory. They never change validator results; the report
//! layer attaches them to diagnostics and averages their confidence.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::graph::TagGraph;
use crate::naming::NamingViolation;
use crate::references::ReferenceViolation;

/// Below this confidence a reference fix is not offered.
pub const MIN_REFERENCE_CONFIDENCE: f64 = 0.5;

/// What a suggestion changes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionKind {
    /// Rewrite a tag's identifier into the naming convention.
    RenameIdentifier,
    /// Point a broken reference at the closest existing tag.
    RetargetReference,
}

/// A proposed textual edit on one source line.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Suggestion {
    /// What kind of fix this is.
    pub kind: SuggestionKind,
    /// File to edit.
    pub file: PathBuf,
    /// Line to edit.
    pub line: u32,
    /// Text to replace on that line.
    pub original: String,
    /// Replacement text.
    pub replacement: String,
    /// Human-readable summary.
    pub message: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

/// Edit distance in characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut row = vec![0; b.len() + 1];
    for i in 1..=a.len() {
        row[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            row[j] = (prev[j] + 1).min(row[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

/// Rewrites an identifier into `[A-Z0-9-]` form.
///
/// Returns the normalized identifier and whether characters had to be
/// dropped (as opposed to only changing case or separators).
pub fn normalize_identifier(identifier: &str) -> (String, bool) {
    let mut out = String::with_capacity(identifier.len());
    let mut dropped = false;
    for c in identifier.chars() {
        let mapped = match c {
            c if c.is_ascii_alphanumeric() => Some(c.to_ascii_uppercase()),
            '-' | '_' => Some('-'),
            c if c.is_whitespace() => Some('-'),
            _ => None,
        };
        match mapped {
            Some('-') if out.ends_with('-') || out.is_empty() => {}
            Some(m) => out.push(m),
            None => dropped = true,
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    (out, dropped)
}

/// Suggests the normalized form of a badly named identifier.
pub fn suggest_naming_fix(violation: &NamingViolation) -> Option<Suggestion> {
    let (fixed, dropped) = normalize_identifier(&violation.identifier);
    if fixed.is_empty() || fixed == violation.identifier {
        return None;
    }
    Some(Suggestion {
        kind: SuggestionKind::RenameIdentifier,
        file: violation.file.clone(),
        line: violation.line,
        original: format!("@{}:{}", violation.category, violation.identifier),
        replacement: format!("@{}:{}", violation.category, fixed),
        message: format!("rename '{}' to '{fixed}'", violation.identifier),
        confidence: if dropped { 0.6 } else { 0.9 },
    })
}

/// Suggests the closest existing identifier in the broken reference's
/// category, if it is similar enough.
pub fn suggest_reference_fix(violation: &ReferenceViolation, graph: &TagGraph) -> Option<Suggestion> {
    let target = violation.target()?;
    let mut best: Option<(&str, usize)> = None;
    for candidate in graph.identifiers_in(&target.category) {
        let distance = levenshtein(&target.identifier, candidate);
        let closer = match best {
            Some((_, d)) => distance < d,
            None => true,
        };
        if closer {
            best = Some((candidate, distance));
        }
    }
    let (candidate, distance) = best?;
    let longest = target
        .identifier
        .chars()
        .count()
        .max(candidate.chars().count());
    if distance == 0 || longest == 0 {
        return None;
    }
    let confidence = 1.0 - distance as f64 / longest as f64;
    if confidence < MIN_REFERENCE_CONFIDENCE {
        return None;
    }
    let replacement = format!("{}:{candidate}", target.category);
    Some(Suggestion {
        kind: SuggestionKind::RetargetReference,
        file: violation.file.clone(),
        line: violation.line,
        original: violation.broken_reference.clone(),
        message: format!(
            "did you mean '{replacement}' instead of '{}'?",
            violation.broken_reference
        ),
        replacement,
        confidence,
    })
}

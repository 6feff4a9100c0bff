//! Identifier naming convention: uppercase letters, digits, and hyphens.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tagtrace_common::TagMatch;

/// An occurrence whose identifier breaks the convention.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct NamingViolation {
    /// The offending identifier.
    pub identifier: String,
    /// Category of the tag carrying it.
    pub category: String,
    /// File of the occurrence.
    pub file: PathBuf,
    /// Line of the occurrence.
    pub line: u32,
    /// What is wrong with it.
    pub message: String,
}

/// Returns `true` for a non-empty identifier made of `A-Z`, `0-9`, and `-`.
pub fn is_valid_identifier(identifier: &str) -> bool {
    !identifier.is_empty()
        && identifier
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
}

fn describe(identifier: &str) -> String {
    let mut problems = Vec::new();
    if identifier.chars().any(|c| c.is_lowercase()) {
        problems.push("lowercase letters");
    }
    if identifier.contains('_') {
        problems.push("underscores");
    }
    if identifier
        .chars()
        .any(|c| !(c.is_alphanumeric() || c == '_' || c == '-'))
    {
        problems.push("other characters");
    }
    if problems.is_empty() {
        return format!("identifier '{identifier}' breaks the naming convention");
    }
    format!(
        "identifier '{identifier}' contains {}; use only uppercase letters, digits, and hyphens",
        problems.join(" and ")
    )
}

/// Reports every occurrence whose identifier is not valid, by location.
pub fn check_naming_consistency(tags: &[TagMatch]) -> Vec<NamingViolation> {
    let mut violations: Vec<NamingViolation> = tags
        .iter()
        .filter(|t| !is_valid_identifier(&t.identifier))
        .map(|t| NamingViolation {
            identifier: t.identifier.clone(),
            category: t.category.clone(),
            file: t.file.clone(),
            line: t.line,
            message: describe(&t.identifier),
        })
        .collect();
    violations.sort_by(|a, b| {
        a.file
            .cmp(&b.file)
            .then(a.line.cmp(&b.line))
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.identifier.cmp(&b.identifier))
    });
    violations
}

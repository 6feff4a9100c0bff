//! Reference integrity.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tagtrace_common::{TagKey, TagMatch};

/// Reason given for a reference whose target never occurs.
pub const REFERENCE_MISSING: &str = "Referenced tag does not exist";

/// Reason given for a reference that is not `CATEGORY:IDENTIFIER`.
pub const REFERENCE_MALFORMED: &str = "Reference is not of the form CATEGORY:IDENTIFIER";

/// A forward reference that does not resolve.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ReferenceViolation {
    /// Identifier of the referencing tag.
    pub source_identifier: String,
    /// Category of the referencing tag.
    pub source_category: String,
    /// The unresolved `CATEGORY:IDENTIFIER` token.
    pub broken_reference: String,
    /// Why it does not resolve.
    pub reason: String,
    /// File of the referencing occurrence.
    pub file: PathBuf,
    /// Line of the referencing occurrence.
    pub line: u32,
}

impl ReferenceViolation {
    /// The parsed target, if the reference is well-formed.
    pub fn target(&self) -> Option<TagKey> {
        TagKey::parse(&self.broken_reference)
    }
}

/// Reports one violation per `(occurrence, reference)` pair whose target
/// does not occur anywhere in `tags`. Ordered by location, then reference.
pub fn validate_reference_integrity(tags: &[TagMatch]) -> Vec<ReferenceViolation> {
    let existing: HashSet<TagKey> = tags.iter().map(TagMatch::key).collect();
    let mut violations = Vec::new();
    for tag in tags {
        for reference in &tag.references {
            let reason = match TagKey::parse(reference) {
                Some(key) if existing.contains(&key) => continue,
                Some(_) => REFERENCE_MISSING,
                None => REFERENCE_MALFORMED,
            };
            violations.push(ReferenceViolation {
                source_identifier: tag.identifier.clone(),
                source_category: tag.category.clone(),
                broken_reference: reference.clone(),
                reason: reason.to_string(),
                file: tag.file.clone(),
                line: tag.line,
            });
        }
    }
    violations.sort_by(|a, b| {
        a.file
            .cmp(&b.file)
            .then(a.line.cmp(&b.line))
            .then_with(|| a.source_category.cmp(&b.source_category))
            .then_with(|| a.source_identifier.cmp(&b.source_identifier))
            .then_with(|| a.broken_reference.cmp(&b.broken_reference))
    });
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{tag, tag_at};
    use pretty_assertions::assert_eq;

    #[test]
    fn resolved_references_are_clean() {
        let tags = vec![tag("TASK", "A-1", &["DESIGN:A-1"]), tag("DESIGN", "A-1", &[])];
        assert!(validate_reference_integrity(&tags).is_empty());
    }

    #[test]
    fn missing_target_reported() {
        let tags = vec![tag("TASK", "A-1", &["DESIGN:A-9"])];
        let violations = validate_reference_integrity(&tags);
        assert_eq!(
            violations,
            vec![ReferenceViolation {
                source_identifier: "A-1".to_string(),
                source_category: "TASK".to_string(),
                broken_reference: "DESIGN:A-9".to_string(),
                reason: REFERENCE_MISSING.to_string(),
                file: PathBuf::from("src/lib.rs"),
                line: 1,
            }]
        );
        assert_eq!(violations[0].target(), Some(TagKey::new("DESIGN", "A-9")));
    }

    #[test]
    fn no_deduplication_across_sources() {
        let tags = vec![
            tag_at("TASK", "A-1", "a.rs", 1, &["DESIGN:GONE"]),
            tag_at("TEST", "A-1", "b.rs", 1, &["DESIGN:GONE"]),
            tag_at("TEST", "A-1", "c.rs", 1, &["DESIGN:GONE"]),
        ];
        assert_eq!(validate_reference_integrity(&tags).len(), 3);
    }

    #[test]
    fn adding_target_clears_violation() {
        let mut tags = vec![tag("TASK", "A-1", &["DESIGN:A-1"])];
        assert_eq!(validate_reference_integrity(&tags).len(), 1);
        tags.push(tag_at("DESIGN", "A-1", "docs/design.md", 3, &[]));
        assert!(validate_reference_integrity(&tags).is_empty());
    }

    #[test]
    fn malformed_reference_has_distinct_reason() {
        let tags = vec![tag("TASK", "A-1", &["nonsense"])];
        let violations = validate_reference_integrity(&tags);
        assert_eq!(violations[0].reason, REFERENCE_MALFORMED);
        assert_eq!(violations[0].target(), None);
    }
}

//! Annotation tag records and graph node keys.
//!
//! A tag is written in source as `@CATEGORY:IDENTIFIER`, optionally followed
//! by free text that may embed references such as `@REQUIREMENT:AUTH-001`.
//! [`TagMatch`] is one such occurrence; [`TagKey`] names the logical graph
//! node shared by every occurrence of the same `(category, identifier)` pair.

use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The logical identity of a tag: its category and identifier.
///
/// Ordered by category, then identifier. Displayed and serialized in
/// reference form as `CATEGORY:IDENTIFIER`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct TagKey {
    /// The uppercase category token (e.g. `REQUIREMENT`).
    pub category: String,
    /// The namespaced identifier (e.g. `AUTH-001`).
    pub identifier: String,
}

impl TagKey {
    /// Creates a new key.
    pub fn new(category: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            identifier: identifier.into(),
        }
    }

    /// Parses a `CATEGORY:IDENTIFIER` reference token, with or without a
    /// leading `@`.
    ///
    /// Returns `None` when either side of the colon is empty.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.strip_prefix('@').unwrap_or(token);
        let (category, identifier) = token.split_once(':')?;
        if category.is_empty() || identifier.is_empty() {
            return None;
        }
        Some(Self::new(category, identifier))
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.identifier)
    }
}

/// One occurrence of an annotation tag in a scanned file.
///
/// Produced fresh by the parser on every scan (or reused verbatim from the
/// scan cache) and never mutated afterwards.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct TagMatch {
    /// The category token, i.e. the text between `@` and `:`.
    pub category: String,
    /// The identifier, i.e. the text after `:` up to the first whitespace.
    pub identifier: String,
    /// Free text trailing the tag on its source line.
    pub description: String,
    /// The file the tag was found in.
    pub file: PathBuf,
    /// The 1-indexed line number of the tag.
    pub line: u32,
    /// Outgoing `CATEGORY:IDENTIFIER` references found in the description.
    #[serde(default)]
    pub references: Vec<String>,
}

impl TagMatch {
    /// Returns the graph node key for this occurrence.
    pub fn key(&self) -> TagKey {
        TagKey::new(&self.category, &self.identifier)
    }

    /// Returns the full tag token as written in source, e.g. `@TEST:AUTH-001`.
    pub fn token(&self) -> String {
        format!("@{}:{}", self.category, self.identifier)
    }

    /// Returns the parsed reference keys, skipping tokens that do not parse.
    pub fn reference_keys(&self) -> impl Iterator<Item = TagKey> + '_ {
        self.references.iter().filter_map(|r| TagKey::parse(r))
    }

    /// Returns `file:line` for display.
    pub fn location(&self) -> String {
        format!("{}:{}", self.file.display(), self.line)
    }

    /// Total order by `(file, line)`, then category, then identifier.
    ///
    /// Every list in a report is sorted with this so that runs over
    /// unchanged input are reproducible.
    pub fn cmp_location(&self, other: &Self) -> Ordering {
        self.file
            .cmp(&other.file)
            .then(self.line.cmp(&other.line))
            .then_with(|| self.category.cmp(&other.category))
            .then_with(|| self.identifier.cmp(&other.identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(category: &str, identifier: &str, refs: &[&str]) -> TagMatch {
        TagMatch {
            category: category.to_string(),
            identifier: identifier.to_string(),
            description: String::new(),
            file: PathBuf::from("src/auth.rs"),
            line: 1,
            references: refs.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn parse_reference_token() {
        let key = TagKey::parse("REQUIREMENT:AUTH-001").unwrap();
        assert_eq!(key.category, "REQUIREMENT");
        assert_eq!(key.identifier, "AUTH-001");
        assert_eq!(TagKey::parse("@DESIGN:AUTH-001").unwrap().category, "DESIGN");
    }

    #[test]
    fn parse_rejects_empty_sides() {
        assert!(TagKey::parse("REQUIREMENT:").is_none());
        assert!(TagKey::parse(":AUTH-001").is_none());
        assert!(TagKey::parse("no-colon").is_none());
    }

    #[test]
    fn key_display() {
        assert_eq!(TagKey::new("TEST", "AUTH-100").to_string(), "TEST:AUTH-100");
    }

    #[test]
    fn token_and_location() {
        let t = tag("TEST", "AUTH-100", &[]);
        assert_eq!(t.token(), "@TEST:AUTH-100");
        assert_eq!(t.location(), "src/auth.rs:1");
    }

    #[test]
    fn reference_keys_skip_malformed() {
        let t = tag("TASK", "AUTH-100", &["DESIGN:AUTH-100", "garbage"]);
        let keys: Vec<TagKey> = t.reference_keys().collect();
        assert_eq!(keys, vec![TagKey::new("DESIGN", "AUTH-100")]);
    }

    #[test]
    fn location_ordering() {
        let mut a = tag("TEST", "A-1", &[]);
        let mut b = tag("TEST", "A-1", &[]);
        a.line = 10;
        b.line = 2;
        assert_eq!(a.cmp_location(&b), Ordering::Greater);
        b.file = PathBuf::from("src/z.rs");
        assert_eq!(a.cmp_location(&b), Ordering::Less);
    }

    #[test]
    fn serde_defaults_references() {
        let json = r#"{"category":"TEST","identifier":"A-1","description":"","file":"a.rs","line":3}"#;
        let t: TagMatch = serde_json::from_str(json).unwrap();
        assert!(t.references.is_empty());
    }
}

//! The annotation line grammar.
//!
//! A matched line contains a tag token `@CATEGORY:IDENTIFIER` where the
//! category is an uppercase token and the identifier runs to the next
//! whitespace. Everything after the token is the description; any
//! `CATEGORY:IDENT` or `@CATEGORY:IDENT` tokens embedded in the description
//! are the tag's outgoing references.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tagtrace_common::TagMatch;

static TAG_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@([A-Z][A-Z0-9_]*):(\S+)").unwrap_or_else(|e| panic!("tag regex: {e}"))
});

static REF_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@?([A-Z][A-Z0-9_]*):([A-Za-z0-9][A-Za-z0-9_.\-]*)")
        .unwrap_or_else(|e| panic!("reference regex: {e}"))
});

/// Comment terminators stripped from the end of a description.
const TRAILING_CLOSERS: [&str; 3] = ["*/", "-->", "#}"];

/// Decodes matched lines into [`TagMatch`] records.
///
/// When constructed with a set of known categories, embedded tokens whose
/// category is not in the set are not treated as references; this keeps
/// prose such as `TODO:fix` out of the reference graph.
#[derive(Debug, Clone, Default)]
pub struct TagGrammar {
    known_categories: Option<HashSet<String>>,
}

impl TagGrammar {
    /// Creates a grammar that accepts any uppercase category in references.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a grammar that only recognises references to the given
    /// categories.
    pub fn with_categories<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known_categories: Some(categories.into_iter().map(Into::into).collect()),
        }
    }

    /// Parses the tag introduced by `pattern` on one line.
    ///
    /// Returns `None` when the line does not contain a well-formed tag token
    /// overlapping an occurrence of `pattern` (e.g. `@TEST:` followed by
    /// whitespace).
    pub fn parse_line(&self, pattern: &str, file: &Path, line: u32, text: &str) -> Option<TagMatch> {
        let text = text.trim_end_matches(['\r', '\n']);
        let token = find_token(pattern, text)?;

        let category = token.get(1)?.as_str();
        let identifier = token.get(2)?.as_str();
        let whole = token.get(0)?;
        let description = clean_description(&text[whole.end()..]);
        let references = self.extract_references(&description);

        Some(TagMatch {
            category: category.to_string(),
            identifier: identifier.to_string(),
            description,
            file: file.to_path_buf(),
            line,
            references,
        })
    }

    /// Extracts `CATEGORY:IDENT` reference tokens from free text, in order of
    /// appearance and without duplicates.
    pub fn extract_references(&self, text: &str) -> Vec<String> {
        let mut refs: Vec<String> = Vec::new();
        for caps in REF_TOKEN.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let preceded_by_word = text[..whole.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
            if preceded_by_word {
                continue;
            }
            let category = &caps[1];
            if let Some(known) = &self.known_categories {
                if !known.contains(category) {
                    continue;
                }
            }
            let identifier = caps[2].trim_end_matches(['.', '-', '_']);
            if identifier.is_empty() {
                continue;
            }
            let reference = format!("{category}:{identifier}");
            if !refs.contains(&reference) {
                refs.push(reference);
            }
        }
        refs
    }
}

/// Finds the first tag token that overlaps an occurrence of `pattern`.
fn find_token<'t>(pattern: &str, text: &'t str) -> Option<regex::Captures<'t>> {
    if pattern.is_empty() {
        return TAG_TOKEN.captures(text);
    }
    for (pos, _) in text.match_indices(pattern) {
        let hit = TAG_TOKEN
            .captures_iter(text)
            .find(|caps| caps.get(0).is_some_and(|m| m.start() <= pos && pos < m.end()));
        if hit.is_some() {
            return hit;
        }
    }
    None
}

fn clean_description(rest: &str) -> String {
    let mut desc = rest.trim();
    loop {
        let before = desc;
        for closer in TRAILING_CLOSERS {
            desc = desc.strip_suffix(closer).unwrap_or(desc).trim_end();
        }
        if desc == before {
            break;
        }
    }
    desc.to_string()
}

//! Finding codes such as `E101` or `S502`.
//!
//! The prefix letter names the kind of traceability problem; the number
//! names the rule. Codes parse back from text so `deny`/`allow` lists can
//! refer to a rule by code in any letter case.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of traceability problem a code belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// `E`: the tag graph is broken (dangling references, cycles).
    Integrity,
    /// `W`: chains are incomplete or tags are disconnected.
    Chain,
    /// `C`: identifiers break the naming convention.
    Convention,
    /// `V`: a taxonomy tier is under-covered.
    Coverage,
    /// `S`: the search tool misbehaved.
    Tool,
}

impl Category {
    const PREFIXES: [(Category, char); 5] = [
        (Category::Integrity, 'E'),
        (Category::Chain, 'W'),
        (Category::Convention, 'C'),
        (Category::Coverage, 'V'),
        (Category::Tool, 'S'),
    ];

    /// Prefix letter used when the code is displayed.
    pub fn prefix(self) -> char {
        Self::PREFIXES
            .iter()
            .find(|(c, _)| *c == self)
            .map_or('?', |(_, p)| *p)
    }

    /// Category for a prefix letter, ignoring case.
    pub fn from_prefix(prefix: char) -> Option<Self> {
        let prefix = prefix.to_ascii_uppercase();
        Self::PREFIXES
            .iter()
            .find(|(_, p)| *p == prefix)
            .map(|(c, _)| *c)
    }
}

/// A prefix letter plus rule number, shown as `E101`. Serialized as that
/// string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DiagnosticCode {
    /// Kind of problem.
    pub category: Category,
    /// Rule number within the kind.
    pub number: u16,
}

impl DiagnosticCode {
    /// Builds a code from its parts.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

/// Text that is not a prefix letter followed by one to three digits.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct InvalidCode(pub String);

impl fmt::Display for InvalidCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a finding code", self.0)
    }
}

impl std::error::Error for InvalidCode {}

impl FromStr for DiagnosticCode {
    type Err = InvalidCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidCode(s.to_string());
        let mut chars = s.trim().chars();
        let category = chars
            .next()
            .and_then(Category::from_prefix)
            .ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.is_empty() || digits.len() > 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let number = digits.parse().map_err(|_| invalid())?;
        Ok(Self::new(category, number))
    }
}

impl From<DiagnosticCode> for String {
    fn from(code: DiagnosticCode) -> Self {
        code.to_string()
    }
}

impl TryFrom<String> for DiagnosticCode {
    type Error = InvalidCode;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

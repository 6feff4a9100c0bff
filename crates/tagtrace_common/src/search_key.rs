//! Stable keys for cached searches.

use std::fmt;
use std::path::Path;

use xxhash_rust::xxh3::Xxh3;

/// XXH3-128 digest of one `(pattern, scope)` search. Displays as 32 hex
/// digits, which is what the cache index stores.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SearchKey(u128);

impl SearchKey {
    /// Key for searching `scope` for `pattern`. A NUL separates the two so
    /// that no pattern/scope split collides with another.
    pub fn new(pattern: &str, scope: &Path) -> Self {
        let mut hasher = Xxh3::new();
        hasher.update(pattern.as_bytes());
        hasher.update(&[0]);
        hasher.update(scope.as_os_str().as_encoded_bytes());
        Self(hasher.digest128())
    }
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

//! Cache Key Module
//!
//! Builds namespaced cache keys from normalized request parameters.

use std::fmt;

/// Prefix shared by every key this service writes.
const KEY_PREFIX: &str = "pkg";

// == Cache Key ==
/// A cache key of the form `pkg:<namespace>:<part>:<part>...`.
///
/// Parts are positional, so the same logical request always yields the same
/// key no matter how the caller ordered its query string. `%` and `:` inside a
/// part are escaped so two different part lists can never render identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Starts a key in the given namespace.
    pub fn new(namespace: &str) -> Self {
        Self(format!("{}:{}", KEY_PREFIX, escape(namespace)))
    }

    /// Appends one request parameter.
    pub fn part(mut self, value: impl fmt::Display) -> Self {
        self.0.push(':');
        self.0.push_str(&escape(&value.to_string()));
        self
    }

    /// The rendered key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn escape(segment: &str) -> String {
    segment.replace('%', "%25").replace(':', "%3A")
}

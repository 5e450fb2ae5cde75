//! Request DTOs for the proxy API
//!
//! Defines the structure of incoming query strings.

/// Query string of `GET /advisories`.
///
/// Every field is kept as raw text so that garbage `per_page` values are
/// normalized by the proxy instead of rejected by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvisoryQuery {
    /// Package ecosystem, `npm` when absent
    pub ecosystem: Option<String>,
    /// Package name (required)
    pub package: Option<String>,
    /// Requested page size
    pub per_page: Option<String>,
}

impl AdvisoryQuery {
    /// Builds the query from decoded `key=value` pairs.
    ///
    /// A repeated key keeps its first value; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (name, value) in pairs {
            let slot = match name.as_str() {
                "ecosystem" => &mut query.ecosystem,
                "package" => &mut query.package,
                "per_page" => &mut query.per_page,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

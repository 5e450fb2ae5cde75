//! Registry Proxy
//!
//! Cached access to package metadata. Upstream errors are forwarded untouched
//! and never cached.

use reqwest::header::ACCEPT;
use tracing::instrument;

use crate::cache::{CacheKey, SharedCache};
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::models::CachedJson;
use crate::proxy::{CachedProxy, PropagateFailure, UpstreamRequest};

const CACHE_NAMESPACE: &str = "metadata";
const FAILURE_MESSAGE: &str = "Failed to fetch package metadata";

// == Registry Proxy ==
pub struct RegistryProxy {
    inner: CachedProxy<PropagateFailure>,
    base_url: String,
}

impl RegistryProxy {
    /// Creates the proxy from configuration, sharing `cache` and `client`.
    pub fn new(config: &Config, cache: SharedCache, client: reqwest::Client) -> Self {
        Self {
            // Failures are never cached, so the failure TTL is unused
            inner: CachedProxy::new(
                cache,
                client,
                config.package_cache_ttl,
                config.package_cache_ttl,
                PropagateFailure::new(FAILURE_MESSAGE),
            ),
            base_url: config.registry_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Seconds advertised in `Cache-Control` on successful responses.
    pub fn max_age(&self) -> u64 {
        self.inner.max_age()
    }

    // == Fetch ==
    /// Returns the registry document for `name` (plain or `@scope/name`).
    #[instrument(skip(self))]
    pub async fn fetch(&self, name: &str) -> Result<CachedJson> {
        let name = name.trim_matches('/');
        if name.trim().is_empty() {
            return Err(ProxyError::InvalidRequest(
                "Package name is required".to_string(),
            ));
        }

        let key = CacheKey::new(CACHE_NAMESPACE).part(name);
        let url = format!("{}/{}", self.base_url, encode_package_name(name));
        let request = UpstreamRequest::get(url).header(ACCEPT, "application/json");

        self.inner.fetch(&key, request).await
    }
}

// == Name Encoding ==
/// Encodes a package name as a single registry path segment.
///
/// Each `/`-separated part is percent-encoded on its own (a leading `@` on the
/// scope is kept literal) and the parts are joined with `%2F`, so
/// `@scope/name` becomes `@scope%2Fname`.
pub fn encode_package_name(name: &str) -> String {
    name.split('/')
        .enumerate()
        .map(|(index, segment)| match segment.strip_prefix('@') {
            Some(scope) if index == 0 => format!("@{}", encode_component(scope)),
            _ => encode_component(segment),
        })
        .collect::<Vec<_>>()
        .join("%2F")
}

/// Percent-encodes like JavaScript's `encodeURIComponent`, which also leaves
/// `!'()*` unescaped.
fn encode_component(segment: &str) -> String {
    urlencoding::encode(segment)
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use std::sync::Arc;

    #[test]
    fn test_encode_plain_name() {
        assert_eq!(encode_package_name("lodash"), "lodash");
        assert_eq!(encode_package_name("lodash.merge"), "lodash.merge");
    }

    #[test]
    fn test_encode_scoped_name() {
        assert_eq!(encode_package_name("@types/node"), "@types%2Fnode");
        assert_eq!(encode_package_name("@my scope/pkg"), "@my%20scope%2Fpkg");
    }

    #[test]
    fn test_encode_keeps_uri_component_marks() {
        assert_eq!(encode_package_name("(weird)!*'"), "(weird)!*'");
        assert_eq!(encode_package_name("a b"), "a%20b");
    }

    #[test]
    fn test_at_sign_only_kept_on_scope() {
        assert_eq!(encode_package_name("@scope/@inner"), "@scope%2F%40inner");
    }

    #[tokio::test]
    async fn test_missing_name_is_invalid() {
        let proxy = RegistryProxy::new(
            &Config::default(),
            Arc::new(MemoryCache::new()),
            reqwest::Client::new(),
        );

        assert!(matches!(proxy.fetch("").await, Err(ProxyError::InvalidRequest(_))));
        assert!(matches!(proxy.fetch("/").await, Err(ProxyError::InvalidRequest(_))));
        assert!(matches!(proxy.fetch("  ").await, Err(ProxyError::InvalidRequest(_))));
    }
}

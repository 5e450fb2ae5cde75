//! Advisory Proxy
//!
//! Cached access to the security-advisory feed. Upstream failures never reach
//! the caller: they turn into an empty list that is itself cached.

use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde_json::json;
use tracing::{field, instrument};

use crate::cache::{CacheKey, SharedCache};
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::models::{AdvisoryQuery, CachedJson};
use crate::proxy::{CachedProxy, SuppressAndCacheEmpty, UpstreamRequest};

const DEFAULT_ECOSYSTEM: &str = "npm";
const CACHE_NAMESPACE: &str = "advisories";

// == Advisory Proxy ==
pub struct AdvisoryProxy {
    inner: CachedProxy<SuppressAndCacheEmpty>,
    advisories_url: String,
    user_agent: String,
    token: Option<String>,
    default_per_page: u32,
    max_per_page: u32,
}

impl AdvisoryProxy {
    /// Creates the proxy from configuration, sharing `cache` and `client`.
    pub fn new(config: &Config, cache: SharedCache, client: reqwest::Client) -> Self {
        Self {
            inner: CachedProxy::new(
                cache,
                client,
                config.advisory_cache_ttl,
                config.advisory_failure_ttl,
                SuppressAndCacheEmpty::new(json!([])),
            ),
            advisories_url: config.advisories_url.clone(),
            user_agent: config.user_agent.clone(),
            token: config.github_token.clone(),
            default_per_page: config.default_per_page,
            max_per_page: config.max_per_page,
        }
    }

    /// Seconds advertised in `Cache-Control` on every response.
    pub fn max_age(&self) -> u64 {
        self.inner.max_age()
    }

    // == Fetch ==
    /// Returns the advisory list for the queried package.
    ///
    /// Fails only when `package` is missing; every upstream problem yields `[]`.
    #[instrument(skip(self, query), fields(ecosystem = field::Empty, package = field::Empty))]
    pub async fn fetch(&self, query: AdvisoryQuery) -> Result<CachedJson> {
        let package = query
            .package
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| {
                ProxyError::InvalidRequest("Query parameter 'package' is required".to_string())
            })?;
        let ecosystem = query
            .ecosystem
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_ECOSYSTEM.to_string());
        let per_page = normalize_per_page(
            query.per_page.as_deref(),
            self.default_per_page,
            self.max_per_page,
        );

        let span = tracing::Span::current();
        span.record("ecosystem", ecosystem.as_str());
        span.record("package", package.as_str());

        let key = CacheKey::new(CACHE_NAMESPACE)
            .part(&ecosystem)
            .part(&package)
            .part(per_page);

        let mut request = UpstreamRequest::get(self.advisories_url.as_str())
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, self.user_agent.as_str())
            .query("ecosystem", ecosystem)
            .query("package", package)
            .query("per_page", per_page.to_string());
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        self.inner.fetch(&key, request).await
    }
}

// == Page Size ==
/// Normalizes a raw `per_page` value into `[1, max]`.
///
/// Absent, empty, non-numeric, zero and negative values give `default`;
/// fractions are floored and anything above `max` is capped.
pub fn normalize_per_page(raw: Option<&str>, default: u32, max: u32) -> u32 {
    let parsed = raw
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok());

    match parsed {
        Some(n) if n.is_finite() && n > 0.0 => (n.min(max as f64).floor() as u32).clamp(1, max.max(1)),
        _ => default,
    }
}

//! Cached Proxy
//!
//! The read-through algorithm shared by every endpoint: check the cache,
//! otherwise call upstream, store what came back, and hand failures to the
//! endpoint's [`FailurePolicy`].

use std::sync::Arc;

use reqwest::header::HeaderName;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::cache::{CacheKey, SharedCache};
use crate::error::Result;
use crate::models::CachedJson;
use crate::proxy::{FailureAction, FailurePolicy, UpstreamFailure};

// == Upstream Request ==
/// One GET against an upstream.
#[derive(Debug, Clone, Default)]
pub struct UpstreamRequest {
    /// Absolute target URL, path already encoded
    pub url: String,
    /// Extra request headers
    pub headers: Vec<(HeaderName, String)>,
    /// Query parameters appended to the URL
    pub query: Vec<(&'static str, String)>,
}

impl UpstreamRequest {
    /// Request for `url` with no headers or query.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Adds a header.
    pub fn header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Adds a query parameter.
    pub fn query(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.query.push((name, value.into()));
        self
    }
}

// == Cached Proxy ==
/// Read-through cache for a single upstream call, parameterized by TTLs and a
/// failure policy.
///
/// Identical concurrent misses are not coalesced: each one calls upstream and
/// writes the cache, last write wins.
pub struct CachedProxy<P> {
    cache: SharedCache,
    client: reqwest::Client,
    success_ttl: u64,
    failure_ttl: u64,
    policy: P,
}

impl<P: FailurePolicy> CachedProxy<P> {
    // == Constructor ==
    pub fn new(
        cache: SharedCache,
        client: reqwest::Client,
        success_ttl: u64,
        failure_ttl: u64,
        policy: P,
    ) -> Self {
        Self {
            cache,
            client,
            success_ttl,
            failure_ttl,
            policy,
        }
    }

    /// TTL advertised to callers on every successful response.
    pub fn max_age(&self) -> u64 {
        self.success_ttl
    }

    // == Fetch ==
    /// Serves `key` from the cache, or from `request` on a miss.
    ///
    /// Callers validate and normalize their parameters before building the key.
    pub async fn fetch(&self, key: &CacheKey, request: UpstreamRequest) -> Result<CachedJson> {
        if let Some(value) = self.lookup(key).await {
            debug!(key = %key, "Cache hit");
            return Ok(self.respond(value));
        }
        debug!(key = %key, url = %request.url, "Cache miss, calling upstream");

        let failure = match self.call_upstream(&request).await {
            Ok(value) => {
                self.store(key, value.clone(), self.success_ttl).await;
                return Ok(self.respond(value));
            }
            Err(failure) => failure,
        };

        match &failure {
            UpstreamFailure::Status { status, body } => {
                error!(
                    url = %request.url,
                    %status,
                    body = %body,
                    "Upstream returned an error status"
                );
            }
            UpstreamFailure::Transport(message) => {
                error!(url = %request.url, error = %message, "Upstream request failed");
            }
        }

        match self.policy.on_failure(failure) {
            FailureAction::Substitute(value) => {
                self.store(key, value.clone(), self.failure_ttl).await;
                Ok(self.respond(value))
            }
            FailureAction::Propagate(err) => Err(err),
        }
    }

    fn respond(&self, value: Value) -> CachedJson {
        CachedJson::new(value, self.success_ttl)
    }

    /// A backend failure is logged and treated as a miss.
    async fn lookup(&self, key: &CacheKey) -> Option<Value> {
        match self.cache.get(key.as_str()).await {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    key = %key,
                    backend = self.cache.backend(),
                    error = %err,
                    "Cache read failed, treating as miss"
                );
                None
            }
        }
    }

    /// Writes on a spawned task so the write finishes even if the request is
    /// dropped while waiting on it.
    async fn store(&self, key: &CacheKey, value: Value, ttl: u64) {
        let cache = Arc::clone(&self.cache);
        let owned_key = key.to_string();
        let write = tokio::spawn(async move { cache.set(&owned_key, value, Some(ttl)).await });

        match write.await {
            Ok(Ok(())) => debug!(key = %key, ttl, "Cached upstream payload"),
            Ok(Err(err)) => {
                warn!(key = %key, backend = self.cache.backend(), error = %err, "Cache write failed")
            }
            Err(err) => warn!(key = %key, error = %err, "Cache write task aborted"),
        }
    }

    async fn call_upstream(
        &self,
        request: &UpstreamRequest,
    ) -> std::result::Result<Value, UpstreamFailure> {
        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.clone(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| UpstreamFailure::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamFailure::Status { status, body });
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| UpstreamFailure::Transport(err.to_string()))
    }
}

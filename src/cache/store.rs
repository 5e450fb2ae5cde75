//! Cache Store Module
//!
//! The capability both backends implement, and the startup factory that picks one.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tracing::{info, warn};

use crate::cache::{MemoryCache, RemoteCache};
use crate::config::Config;
use crate::error::CacheError;

// == Cache Store ==
/// Key/value storage for upstream payloads.
///
/// There is deliberately no delete or enumeration: entries go away only by
/// TTL lapse or by being overwritten.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;

    /// Returns the value stored under `key`, or `None` on a miss or an expired entry.
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError>;

    /// Stores `value` under `key`, replacing whatever was there.
    ///
    /// `ttl_seconds` of `None` or `0` means no forced expiry.
    async fn set(&self, key: &str, value: Value, ttl_seconds: Option<u64>)
        -> Result<(), CacheError>;
}

/// The cache handle injected into every proxy.
pub type SharedCache = Arc<dyn CacheStore>;

// == Factory ==
/// Chooses the cache backend for the life of the process.
///
/// The remote backend is used only when both its url and token are configured
/// and the url parses as an absolute http(s) URL. Anything else falls back to
/// the in-process map with a single warning.
pub fn build_cache_store(config: &Config, client: reqwest::Client) -> SharedCache {
    let Some(remote) = &config.remote_cache else {
        warn!("STORAGE_REDIS_URL is not configured. Falling back to in-memory cache.");
        return Arc::new(MemoryCache::new());
    };

    match Url::parse(&remote.url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            info!(url = %url, "Using remote cache backend");
            Arc::new(RemoteCache::new(client, url, remote.token.clone()))
        }
        Ok(url) => {
            warn!(
                scheme = url.scheme(),
                "STORAGE_REDIS_URL must be an http(s) URL. Falling back to in-memory cache."
            );
            Arc::new(MemoryCache::new())
        }
        Err(err) => {
            warn!(error = %err, "STORAGE_REDIS_URL is malformed. Falling back to in-memory cache.");
            Arc::new(MemoryCache::new())
        }
    }
}

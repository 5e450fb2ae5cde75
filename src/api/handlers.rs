//! API Handlers
//!
//! HTTP request handlers for each proxy endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::{build_cache_store, SharedCache};
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::models::{AdvisoryQuery, CachedJson, HealthResponse};
use crate::proxy::{build_http_client, AdvisoryProxy, RegistryProxy};

/// Application state shared across all handlers.
///
/// Both proxies read through the same cache instance, chosen once at startup.
#[derive(Clone)]
pub struct AppState {
    /// The process-wide cache backend
    pub cache: SharedCache,
    /// Advisory feed proxy
    pub advisories: Arc<AdvisoryProxy>,
    /// Package registry proxy
    pub registry: Arc<RegistryProxy>,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(config: &Config, cache: SharedCache, client: reqwest::Client) -> Self {
        Self {
            advisories: Arc::new(AdvisoryProxy::new(config, cache.clone(), client.clone())),
            registry: Arc::new(RegistryProxy::new(config, cache.clone(), client)),
            cache,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the shared HTTP client and selects the cache backend.
    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        let client = build_http_client(config.upstream_timeout)?;
        let cache = build_cache_store(config, client.clone());
        Ok(Self::new(config, cache, client))
    }
}

/// Handler for GET /advisories
///
/// Always answers 200 with a JSON array once `package` is present.
/// Parameters are taken as raw pairs so repeated keys cannot fail extraction.
pub async fn advisories_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<CachedJson> {
    state.advisories.fetch(AdvisoryQuery::from_pairs(pairs)).await
}

/// Handler for GET /registry/*name
///
/// Forwards the upstream status on failure.
pub async fn registry_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<CachedJson> {
    state.registry.fetch(&name).await
}

/// Handler for GET /registry without a package name.
pub async fn registry_missing_name_handler() -> Result<CachedJson> {
    Err(ProxyError::InvalidRequest(
        "Package name is required".to_string(),
    ))
}

/// Fallback for any method other than GET on a proxy route.
pub async fn method_not_allowed_handler() -> ProxyError {
    ProxyError::MethodNotSupported
}

/// Handler for GET /health
///
/// Returns health status and the active cache backend.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.backend()))
}

//! Response DTOs for the proxy API
//!
//! Defines the structure of outgoing HTTP response bodies.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

/// A JSON payload served with a shared-cache freshness directive.
///
/// `max_age` is always the configured TTL, never the time an entry has left.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedJson {
    /// Upstream payload (or its substitute)
    pub body: Value,
    /// Seconds advertised in `Cache-Control: s-maxage`
    pub max_age: u64,
}

impl CachedJson {
    /// Creates a new CachedJson
    pub fn new(body: Value, max_age: u64) -> Self {
        Self { body, max_age }
    }
}

impl IntoResponse for CachedJson {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CACHE_CONTROL, format!("s-maxage={}", self.max_age))],
            Json(self.body),
        )
            .into_response()
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Active cache backend ("memory" or "remote")
    pub cache_backend: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(cache_backend: &str) -> Self {
        Self {
            status: "healthy".to_string(),
            cache_backend: cache_backend.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

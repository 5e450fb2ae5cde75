//! Error types for the caching proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Proxy Error Enum ==
/// Errors a proxied request can end in.
///
/// Which of these a caller can actually observe depends on the endpoint's
/// failure policy: the advisory endpoint never surfaces upstream failures.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// A required request parameter is missing
    #[error("{0}")]
    InvalidRequest(String),

    /// Only GET is served
    #[error("Method Not Allowed")]
    MethodNotSupported,

    /// Upstream answered with a non-success status
    #[error("upstream returned {status}")]
    UpstreamFailure { status: StatusCode, body: String },

    /// Upstream could not be reached or its body could not be decoded
    #[error("{0}")]
    TransportFailure(String),
}

// == Cache Error Enum ==
/// Failures of the remote cache backend.
///
/// Never reaches a caller; the proxy downgrades it to a miss (or a skipped
/// write) after logging.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Remote store unreachable or returned garbage
    #[error("cache backend failure: {0}")]
    Backend(String),
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        CacheError::Backend(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ProxyError::MethodNotSupported => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, "GET")],
                Json(json!({ "error": "Method Not Allowed" })),
            )
                .into_response(),
            // Upstream truth is forwarded as-is, body included
            ProxyError::UpstreamFailure { status, body } => (status, body).into_response(),
            ProxyError::TransportFailure(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": msg })),
            )
                .into_response(),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for proxied requests.
pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_is_bad_request() {
        let response = ProxyError::InvalidRequest("missing".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_method_not_supported_sets_allow() {
        let response = ProxyError::MethodNotSupported.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET");
    }

    #[test]
    fn test_upstream_failure_keeps_status() {
        let response = ProxyError::UpstreamFailure {
            status: StatusCode::NOT_FOUND,
            body: "Not found".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_transport_failure_is_server_error() {
        let response = ProxyError::TransportFailure("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

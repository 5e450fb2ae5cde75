//! Failure Policies
//!
//! What a proxy does when its upstream call does not produce a payload.

use axum::http::StatusCode;
use serde_json::Value;

use crate::error::ProxyError;

// == Upstream Failure ==
/// Why an upstream call produced no payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamFailure {
    /// Upstream answered with a non-success status
    Status { status: StatusCode, body: String },
    /// Request never completed, or the body was not JSON
    Transport(String),
}

// == Failure Action ==
/// Outcome a policy chooses for a failed upstream call.
#[derive(Debug)]
pub enum FailureAction {
    /// Cache this value with the failure TTL and answer with it as a success
    Substitute(Value),
    /// Cache nothing and fail the request
    Propagate(ProxyError),
}

// == Failure Policy ==
/// Strategy consulted by [`CachedProxy`](super::CachedProxy) on every upstream failure.
pub trait FailurePolicy: Send + Sync {
    fn on_failure(&self, failure: UpstreamFailure) -> FailureAction;
}

// == Suppress And Cache Empty ==
/// Hides upstream outages behind an empty result.
///
/// The empty result is cached so an outage costs one upstream call per
/// failure TTL instead of one per request.
#[derive(Debug, Clone)]
pub struct SuppressAndCacheEmpty {
    empty: Value,
}

impl SuppressAndCacheEmpty {
    /// Substitutes `empty` for every failure.
    pub fn new(empty: Value) -> Self {
        Self { empty }
    }
}

impl FailurePolicy for SuppressAndCacheEmpty {
    fn on_failure(&self, _failure: UpstreamFailure) -> FailureAction {
        FailureAction::Substitute(self.empty.clone())
    }
}

// == Propagate Failure ==
/// Forwards upstream truth: the upstream status for HTTP errors, a generic
/// server error for transport errors.
#[derive(Debug, Clone)]
pub struct PropagateFailure {
    message: &'static str,
}

impl PropagateFailure {
    /// `message` is used for transport errors and for empty upstream bodies.
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

impl FailurePolicy for PropagateFailure {
    fn on_failure(&self, failure: UpstreamFailure) -> FailureAction {
        let error = match failure {
            UpstreamFailure::Status { status, body } => ProxyError::UpstreamFailure {
                status,
                body: if body.is_empty() {
                    self.message.to_string()
                } else {
                    body
                },
            },
            UpstreamFailure::Transport(_) => ProxyError::TransportFailure(self.message.to_string()),
        };
        FailureAction::Propagate(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_suppress_substitutes_for_any_failure() {
        let policy = SuppressAndCacheEmpty::new(json!([]));

        let action = policy.on_failure(UpstreamFailure::Status {
            status: StatusCode::BAD_GATEWAY,
            body: "down".to_string(),
        });
        assert!(matches!(action, FailureAction::Substitute(v) if v == json!([])));

        let action = policy.on_failure(UpstreamFailure::Transport("reset".to_string()));
        assert!(matches!(action, FailureAction::Substitute(v) if v == json!([])));
    }

    #[test]
    fn test_propagate_keeps_status_and_body() {
        let policy = PropagateFailure::new("Failed");

        let action = policy.on_failure(UpstreamFailure::Status {
            status: StatusCode::NOT_FOUND,
            body: "{\"error\":\"Not found\"}".to_string(),
        });
        match action {
            FailureAction::Propagate(ProxyError::UpstreamFailure { status, body }) => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(body, "{\"error\":\"Not found\"}");
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_propagate_fills_empty_body() {
        let policy = PropagateFailure::new("Failed");

        let action = policy.on_failure(UpstreamFailure::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: String::new(),
        });
        assert!(matches!(
            action,
            FailureAction::Propagate(ProxyError::UpstreamFailure { body, .. }) if body == "Failed"
        ));
    }

    #[test]
    fn test_propagate_transport_is_distinct() {
        let policy = PropagateFailure::new("Failed");

        let action = policy.on_failure(UpstreamFailure::Transport("timed out".to_string()));
        assert!(matches!(
            action,
            FailureAction::Propagate(ProxyError::TransportFailure(msg)) if msg == "Failed"
        ));
    }
}

//! Proxy Module
//!
//! Read-through caching in front of the upstream APIs.
//!
//! # Proxies
//! - [`AdvisoryProxy`] - security advisories; failures become a cached empty list
//! - [`RegistryProxy`] - package metadata; failures are forwarded to the caller

mod advisory;
mod cached;
mod policy;
mod registry;

pub use advisory::{normalize_per_page, AdvisoryProxy};
pub use cached::{CachedProxy, UpstreamRequest};
pub use policy::{FailureAction, FailurePolicy, PropagateFailure, SuppressAndCacheEmpty, UpstreamFailure};
pub use registry::{encode_package_name, RegistryProxy};

use std::time::Duration;

/// Builds the HTTP client shared by both upstreams and the remote cache.
pub fn build_http_client(timeout_secs: u64) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

//! Request and Response models for the proxy API
//!
//! This module defines the DTOs used for deserializing query strings and
//! serializing HTTP response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::AdvisoryQuery;
pub use responses::{CachedJson, HealthResponse};

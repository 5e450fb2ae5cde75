//! API Module
//!
//! HTTP handlers and routing for the caching proxy.
//!
//! # Endpoints
//! - `GET /advisories?ecosystem=&package=&per_page=` - Cached advisory list
//! - `GET /registry/*name` - Cached package metadata
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

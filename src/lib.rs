//! PkgLens Cache - A read-through caching proxy
//!
//! Serves package registry metadata and security advisories from a cache
//! (in-process or remote) and falls back to the upstream APIs on a miss.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod proxy;

pub use api::AppState;
pub use config::Config;

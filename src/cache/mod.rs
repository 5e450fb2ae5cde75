//! Cache Module
//!
//! Provides the cache abstraction the proxies read through, with an
//! in-process backend and a remote (Redis REST) backend.

mod entry;
mod key;
mod memory;
mod remote;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use memory::MemoryCache;
pub use remote::RemoteCache;
pub use store::{build_cache_store, CacheStore, SharedCache};

//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;

// == Defaults ==
pub const DEFAULT_ADVISORIES_URL: &str = "https://api.github.com/advisories";
pub const DEFAULT_REGISTRY_BASE_URL: &str = "https://registry.npmjs.org";
pub const DEFAULT_ADVISORY_CACHE_TTL: u64 = 900;
pub const DEFAULT_PACKAGE_CACHE_TTL: u64 = 3600;
pub const DEFAULT_PER_PAGE: u32 = 100;
pub const MAX_PER_PAGE: u32 = 100;
pub const DEFAULT_USER_AGENT: &str = "PkgLens-API";
pub const DEFAULT_UPSTREAM_TIMEOUT: u64 = 10;
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Connection parameters for the remote cache backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCacheConfig {
    /// REST endpoint of the store
    pub url: String,
    /// Bearer token sent with every command
    pub token: String,
}

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Advisory feed endpoint
    pub advisories_url: String,
    /// Package registry base URL
    pub registry_base_url: String,
    /// TTL in seconds for cached advisory lists
    pub advisory_cache_ttl: u64,
    /// TTL in seconds for the empty list stored after an advisory failure
    pub advisory_failure_ttl: u64,
    /// TTL in seconds for cached package metadata
    pub package_cache_ttl: u64,
    /// Page size used when the caller gives none (or garbage)
    pub default_per_page: u32,
    /// Upper bound for the advisory page size
    pub max_per_page: u32,
    /// Optional bearer token for the advisory feed
    pub github_token: Option<String>,
    /// User agent sent to the advisory feed
    pub user_agent: String,
    /// Remote cache backend, present only when both url and token are set
    pub remote_cache: Option<RemoteCacheConfig>,
    /// Timeout in seconds for every upstream call
    pub upstream_timeout: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `GITHUB_ADVISORIES_URL`, `NPM_REGISTRY_BASE_URL` - upstream endpoints
    /// - `ADVISORY_CACHE_TTL` (900), `ADVISORY_FAILURE_CACHE_TTL` (= advisory TTL),
    ///   `PACKAGE_CACHE_TTL` (3600) - TTLs in seconds
    /// - `ADVISORY_DEFAULT_PER_PAGE`, `ADVISORY_MAX_PER_PAGE` (100) - page size bounds
    /// - `GITHUB_TOKEN`, `GITHUB_USER_AGENT` - advisory request headers
    /// - `STORAGE_REDIS_URL`, `STORAGE_REDIS_TOKEN` - remote cache backend
    /// - `UPSTREAM_TIMEOUT_SECS` (10), `SERVER_PORT` (3000)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty strings count as unset
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let advisory_cache_ttl =
            resolve_positive(var("ADVISORY_CACHE_TTL"), DEFAULT_ADVISORY_CACHE_TTL);
        let max_per_page = resolve_positive(var("ADVISORY_MAX_PER_PAGE"), MAX_PER_PAGE);
        let default_per_page = resolve_positive(var("ADVISORY_DEFAULT_PER_PAGE"), DEFAULT_PER_PAGE)
            .clamp(1, max_per_page);

        let remote_cache = match (var("STORAGE_REDIS_URL"), var("STORAGE_REDIS_TOKEN")) {
            (Some(url), Some(token)) => Some(RemoteCacheConfig { url, token }),
            _ => None,
        };

        Self {
            advisories_url: var("GITHUB_ADVISORIES_URL")
                .unwrap_or_else(|| DEFAULT_ADVISORIES_URL.to_string()),
            registry_base_url: var("NPM_REGISTRY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_REGISTRY_BASE_URL.to_string()),
            advisory_cache_ttl,
            advisory_failure_ttl: resolve_positive(
                var("ADVISORY_FAILURE_CACHE_TTL"),
                advisory_cache_ttl,
            ),
            package_cache_ttl: resolve_positive(var("PACKAGE_CACHE_TTL"), DEFAULT_PACKAGE_CACHE_TTL),
            default_per_page,
            max_per_page,
            github_token: var("GITHUB_TOKEN"),
            user_agent: var("GITHUB_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            remote_cache,
            upstream_timeout: resolve_positive(var("UPSTREAM_TIMEOUT_SECS"), DEFAULT_UPSTREAM_TIMEOUT),
            server_port: var("SERVER_PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
        }
    }
}

/// Reads a strictly positive integer, falling back when absent, zero or invalid.
///
/// Only the leading digits count, so `"60s"` reads as 60 and `"1.5"` as 1.
fn resolve_positive<T>(value: Option<String>, fallback: T) -> T
where
    T: std::str::FromStr + PartialOrd + Default,
{
    value
        .as_deref()
        .and_then(leading_integer)
        .and_then(|digits| digits.parse::<T>().ok())
        .filter(|parsed| *parsed > T::default())
        .unwrap_or(fallback)
}

/// The run of ASCII digits at the start of `value`, after whitespace and an
/// optional `+`. Negative values have no such run.
fn leading_integer(value: &str) -> Option<&str> {
    let value = value.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    (end > 0).then(|| &value[..end])
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.advisories_url, DEFAULT_ADVISORIES_URL);
        assert_eq!(config.registry_base_url, DEFAULT_REGISTRY_BASE_URL);
        assert_eq!(config.advisory_cache_ttl, 900);
        assert_eq!(config.advisory_failure_ttl, 900);
        assert_eq!(config.package_cache_ttl, 3600);
        assert_eq!(config.default_per_page, 100);
        assert_eq!(config.max_per_page, 100);
        assert_eq!(config.user_agent, "PkgLens-API");
        assert!(config.github_token.is_none());
        assert!(config.remote_cache.is_none());
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_ttl_falls_back_on_garbage() {
        let config = config_with(&[
            ("ADVISORY_CACHE_TTL", "-5"),
            ("PACKAGE_CACHE_TTL", "soon"),
        ]);
        assert_eq!(config.advisory_cache_ttl, 900);
        assert_eq!(config.package_cache_ttl, 3600);

        let config = config_with(&[("ADVISORY_CACHE_TTL", "0")]);
        assert_eq!(config.advisory_cache_ttl, 900);
    }

    #[test]
    fn test_ttl_reads_leading_integer() {
        let config = config_with(&[
            ("ADVISORY_CACHE_TTL", "60s"),
            ("PACKAGE_CACHE_TTL", "1.5"),
            ("UPSTREAM_TIMEOUT_SECS", " +7"),
        ]);
        assert_eq!(config.advisory_cache_ttl, 60);
        assert_eq!(config.package_cache_ttl, 1);
        assert_eq!(config.upstream_timeout, 7);

        let config = config_with(&[("ADVISORY_CACHE_TTL", "0.9"), ("PACKAGE_CACHE_TTL", "s60")]);
        assert_eq!(config.advisory_cache_ttl, 900);
        assert_eq!(config.package_cache_ttl, 3600);
    }

    #[test]
    fn test_failure_ttl_follows_advisory_ttl() {
        let config = config_with(&[("ADVISORY_CACHE_TTL", "60")]);
        assert_eq!(config.advisory_cache_ttl, 60);
        assert_eq!(config.advisory_failure_ttl, 60);

        let config = config_with(&[("ADVISORY_CACHE_TTL", "60"), ("ADVISORY_FAILURE_CACHE_TTL", "5")]);
        assert_eq!(config.advisory_failure_ttl, 5);
    }

    #[test]
    fn test_remote_cache_requires_url_and_token() {
        let config = config_with(&[("STORAGE_REDIS_URL", "https://cache.example.com")]);
        assert!(config.remote_cache.is_none());

        let config = config_with(&[("STORAGE_REDIS_TOKEN", "secret")]);
        assert!(config.remote_cache.is_none());

        let config = config_with(&[
            ("STORAGE_REDIS_URL", "https://cache.example.com"),
            ("STORAGE_REDIS_TOKEN", "secret"),
        ]);
        assert_eq!(
            config.remote_cache,
            Some(RemoteCacheConfig {
                url: "https://cache.example.com".to_string(),
                token: "secret".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let config = config_with(&[("GITHUB_TOKEN", ""), ("GITHUB_USER_AGENT", "  ")]);
        assert!(config.github_token.is_none());
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_default_per_page_clamped_to_max() {
        let config = config_with(&[("ADVISORY_DEFAULT_PER_PAGE", "500"), ("ADVISORY_MAX_PER_PAGE", "50")]);
        assert_eq!(config.max_per_page, 50);
        assert_eq!(config.default_per_page, 50);
    }
}

//! Remote Cache Module
//!
//! Cache backend speaking the Redis-over-REST protocol (Upstash style):
//! each command is a JSON array POSTed to the store URL with a bearer token,
//! and the reply is `{"result": ...}` or `{"error": "..."}`.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::cache::CacheStore;
use crate::error::CacheError;

/// Reply envelope of the REST endpoint.
#[derive(Debug, Deserialize)]
struct CommandReply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

// == Remote Cache ==
/// Network-backed cache shared by every instance pointing at the same store.
///
/// Expiry is delegated to the store's native `EX` option.
#[derive(Debug, Clone)]
pub struct RemoteCache {
    client: reqwest::Client,
    url: Url,
    token: String,
}

impl RemoteCache {
    /// Creates a backend for the store at `url`.
    pub fn new(client: reqwest::Client, url: Url, token: String) -> Self {
        Self { client, url, token }
    }

    /// Sends one command and returns its `result`.
    async fn command(&self, command: Value) -> Result<Option<Value>, CacheError> {
        let response = self
            .client
            .post(self.url.clone())
            .bearer_auth(&self.token)
            .json(&command)
            .send()
            .await?;

        let status = response.status();
        let reply: CommandReply = response.json().await.map_err(|err| {
            CacheError::Backend(format!("undecodable reply (status {}): {}", status, err))
        })?;

        if let Some(error) = reply.error {
            return Err(CacheError::Backend(error));
        }
        if !status.is_success() {
            return Err(CacheError::Backend(format!("store returned {}", status)));
        }

        Ok(reply.result)
    }
}

#[async_trait]
impl CacheStore for RemoteCache {
    fn backend(&self) -> &'static str {
        "remote"
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let result = self.command(json!(["GET", key])).await?;

        Ok(match result {
            None | Some(Value::Null) => None,
            // Values are written as JSON text; anything else written by a
            // foreign client comes back as a plain string
            Some(Value::String(raw)) => {
                Some(serde_json::from_str(&raw).unwrap_or(Value::String(raw)))
            }
            Some(other) => Some(other),
        })
    }

    async fn set(
        &self,
        key: &str,
        value: Value,
        ttl_seconds: Option<u64>,
    ) -> Result<(), CacheError> {
        let payload = value.to_string();
        let command = match ttl_seconds.filter(|ttl| *ttl > 0) {
            Some(ttl) => json!(["SET", key, payload, "EX", ttl.to_string()]),
            None => json!(["SET", key, payload]),
        };

        self.command(command).await?;
        debug!(key, ttl = ?ttl_seconds, "Stored entry in remote cache");
        Ok(())
    }
}

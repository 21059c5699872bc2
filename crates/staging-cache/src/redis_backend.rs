//! Redis-backed `StagingCache`. Read semantics (decode-as-JSON-else-raw
//! -string) follow original_source `db/redis/services.py` exactly.

use redis::AsyncCommands;
use serde_json::Value;
use tracing::instrument;

use crate::trait_::{StagingCache, StagingCacheError};

#[derive(Clone)]
pub struct RedisStagingCache {
    client: redis::Client,
}

impl RedisStagingCache {
    pub fn new(redis_url: impl AsRef<str>) -> Result<Self, StagingCacheError> {
        let client = redis::Client::open(redis_url.as_ref())
            .map_err(|e| StagingCacheError::Unavailable(e.to_string()))?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StagingCacheError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StagingCacheError::Unavailable(e.to_string()))
    }
}

/// Decode a raw Redis string value: JSON if it parses, otherwise the raw
/// string itself (mirrors `db/redis/services.py::decode_value`).
fn decode_value(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

#[async_trait::async_trait]
impl StagingCache for RedisStagingCache {
    #[instrument(skip(self, value), err)]
    async fn put(&self, key: &str, value: Value) -> Result<(), StagingCacheError> {
        let payload = serde_json::to_string(&value)
            .map_err(|e| StagingCacheError::Unavailable(e.to_string()))?;
        let mut conn = self.connection().await?;
        let _: () = conn
            .set(key, payload)
            .await
            .map_err(|e| StagingCacheError::Unavailable(e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn get(&self, key: &str) -> Result<Option<Value>, StagingCacheError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| StagingCacheError::Unavailable(e.to_string()))?;
        Ok(raw.map(decode_value))
    }

    #[instrument(skip(self), err)]
    async fn get_all(&self) -> Result<Vec<(String, Value)>, StagingCacheError> {
        let mut conn = self.connection().await?;
        let keys: Vec<String> = conn
            .keys("*")
            .await
            .map_err(|e| StagingCacheError::Unavailable(e.to_string()))?;

        let mut out = Vec::with_capacity(keys.len());
        for key in keys {
            let raw: Option<String> = conn
                .get(&key)
                .await
                .map_err(|e| StagingCacheError::Unavailable(e.to_string()))?;
            if let Some(raw) = raw {
                out.push((key, decode_value(raw)));
            }
        }
        Ok(out)
    }

    #[instrument(skip(self), err)]
    async fn delete_one(&self, key: &str) -> Result<u64, StagingCacheError> {
        let mut conn = self.connection().await?;
        conn.del(key)
            .await
            .map_err(|e| StagingCacheError::Unavailable(e.to_string()))
    }

    #[instrument(skip(self), err)]
    async fn delete_all(&self) -> Result<u64, StagingCacheError> {
        let mut conn = self.connection().await?;
        let keys: Vec<String> = conn
            .keys("*")
            .await
            .map_err(|e| StagingCacheError::Unavailable(e.to_string()))?;
        if keys.is_empty() {
            return Ok(0);
        }
        conn.del(keys.clone())
            .await
            .map_err(|e| StagingCacheError::Unavailable(e.to_string()))?;
        Ok(keys.len() as u64)
    }
}

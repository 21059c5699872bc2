use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StagingCacheError {
    #[error("staging cache unavailable: {0}")]
    Unavailable(String),
}

/// Shared process-wide staging buffer keyed by record id.
///
/// Any pipeline instance may observe entries staged by any other instance
/// (spec §4.4): this is the cross-process property the durability contract
/// depends on.
#[async_trait::async_trait]
pub trait StagingCache: Send + Sync {
    /// Idempotent overwrite.
    async fn put(&self, key: &str, value: Value) -> Result<(), StagingCacheError>;

    /// `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<Value>, StagingCacheError>;

    /// All currently-staged `(key, value)` pairs, in no particular order.
    async fn get_all(&self) -> Result<Vec<(String, Value)>, StagingCacheError>;

    /// Delete a single key. Returns the number of keys evicted (0 or 1).
    async fn delete_one(&self, key: &str) -> Result<u64, StagingCacheError>;

    /// Evict every staged entry. Returns the number of keys evicted.
    async fn delete_all(&self) -> Result<u64, StagingCacheError>;
}

#[async_trait::async_trait]
impl<C> StagingCache for std::sync::Arc<C>
where
    C: StagingCache + ?Sized,
{
    async fn put(&self, key: &str, value: Value) -> Result<(), StagingCacheError> {
        (**self).put(key, value).await
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StagingCacheError> {
        (**self).get(key).await
    }

    async fn get_all(&self) -> Result<Vec<(String, Value)>, StagingCacheError> {
        (**self).get_all().await
    }

    async fn delete_one(&self, key: &str) -> Result<u64, StagingCacheError> {
        (**self).delete_one(key).await
    }

    async fn delete_all(&self) -> Result<u64, StagingCacheError> {
        (**self).delete_all().await
    }
}

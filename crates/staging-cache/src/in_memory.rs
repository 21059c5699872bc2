use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use crate::trait_::{StagingCache, StagingCacheError};

/// In-memory staging cache for tests and the in-process example.
///
/// A single instance is typically wrapped in `Arc` and shared across
/// multiple `IngestionPipeline`s to simulate the cross-process sharing
/// property of the Redis-backed adapter (spec §4.4/§8 scenario 3/6).
#[derive(Debug, Default)]
pub struct InMemoryStagingCache {
    entries: RwLock<HashMap<String, Value>>,
}

impl InMemoryStagingCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl StagingCache for InMemoryStagingCache {
    async fn put(&self, key: &str, value: Value) -> Result<(), StagingCacheError> {
        self.entries
            .write()
            .expect("staging cache lock poisoned")
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StagingCacheError> {
        Ok(self
            .entries
            .read()
            .expect("staging cache lock poisoned")
            .get(key)
            .cloned())
    }

    async fn get_all(&self) -> Result<Vec<(String, Value)>, StagingCacheError> {
        Ok(self
            .entries
            .read()
            .expect("staging cache lock poisoned")
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn delete_one(&self, key: &str) -> Result<u64, StagingCacheError> {
        let removed = self
            .entries
            .write()
            .expect("staging cache lock poisoned")
            .remove(key)
            .is_some();
        Ok(removed as u64)
    }

    async fn delete_all(&self) -> Result<u64, StagingCacheError> {
        let mut entries = self.entries.write().expect("staging cache lock poisoned");
        let count = entries.len() as u64;
        entries.clear();
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn put_is_idempotent() {
        let cache = InMemoryStagingCache::new();
        cache.put("k", json!({"a": 1})).await.unwrap();
        cache.put("k", json!({"a": 1})).await.unwrap();
        assert_eq!(cache.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_all_evicts_everything_and_reports_count() {
        let cache = InMemoryStagingCache::new();
        cache.put("a", json!(1)).await.unwrap();
        cache.put("b", json!(2)).await.unwrap();

        let evicted = cache.delete_all().await.unwrap();
        assert_eq!(evicted, 2);
        assert!(cache.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_missing_key_returns_none() {
        let cache = InMemoryStagingCache::new();
        assert_eq!(cache.get("missing").await.unwrap(), None);
    }
}

//! The shared, cross-process fast KV buffer between `LocalBatch` and
//! `ColdStore` (spec §4.4). Deliberately process-external: the durability
//! property the ingestion pipeline relies on depends on this cache
//! surviving the death of any one pipeline instance (spec §9).

mod in_memory;
#[cfg(feature = "redis-backend")]
mod redis_backend;
mod trait_;

pub use in_memory::InMemoryStagingCache;
#[cfg(feature = "redis-backend")]
pub use redis_backend::RedisStagingCache;
pub use trait_::{StagingCache, StagingCacheError};

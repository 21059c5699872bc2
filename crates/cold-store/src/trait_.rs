use thiserror::Error;

use crate::row::ColdRow;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColdStoreError {
    #[error("cold store unavailable: {0}")]
    Unavailable(String),
}

/// The durable columnar analytical store for logs (spec §4.5).
#[async_trait::async_trait]
pub trait ColdStore: Send + Sync {
    /// Insert a heterogeneous batch. The adapter computes the union of
    /// column keys across `batch` and issues one multi-row insert;
    /// rows missing a given column get `NULL` there. Returns the number of
    /// rows accepted — `batch.len()` on full success, less on partial
    /// success, `0` on total failure (never an `Err` for a partial insert;
    /// connection/query errors are the only `Err` case).
    async fn insert(&self, batch: &[ColdRow]) -> Result<usize, ColdStoreError>;

    /// Fetch rows ordered by `timestamp` descending. `None` fetches every
    /// row; `Some(ids)` filters to the given `log_id`s.
    async fn fetch(&self, ids: Option<&[String]>) -> Result<Vec<ColdRow>, ColdStoreError>;

    /// Delete rows. `None` truncates the table; `Some(ids)` deletes by id set.
    async fn delete(&self, ids: Option<&[String]>) -> Result<(), ColdStoreError>;
}

#[async_trait::async_trait]
impl<S> ColdStore for std::sync::Arc<S>
where
    S: ColdStore + ?Sized,
{
    async fn insert(&self, batch: &[ColdRow]) -> Result<usize, ColdStoreError> {
        (**self).insert(batch).await
    }

    async fn fetch(&self, ids: Option<&[String]>) -> Result<Vec<ColdRow>, ColdStoreError> {
        (**self).fetch(ids).await
    }

    async fn delete(&self, ids: Option<&[String]>) -> Result<(), ColdStoreError> {
        (**self).delete(ids).await
    }
}

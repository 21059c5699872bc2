use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;

use crate::row::{ColdRow, ColumnValue};
use crate::trait_::{ColdStore, ColdStoreError};

/// In-memory `ColdStore` test double.
///
/// Supports simulating partial-success inserts (spec §8 scenario 4:
/// `ColdStore` accepts `N-1` of an `N`-row batch) via
/// [`InMemoryColdStore::fail_last_n_inserts`].
#[derive(Debug, Default)]
pub struct InMemoryColdStore {
    rows: RwLock<Vec<ColdRow>>,
    reject_per_batch: AtomicUsize,
}

impl InMemoryColdStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent `insert` call accepts `batch.len() - n` rows
    /// (saturating at 0), simulating a partial ClickHouse insert.
    pub fn reject_per_batch(&self, n: usize) {
        self.reject_per_batch.store(n, Ordering::SeqCst);
    }

    pub fn row_count(&self) -> usize {
        self.rows.read().expect("cold store lock poisoned").len()
    }
}

fn log_id_of(row: &ColdRow) -> Option<String> {
    match row.get("log_id") {
        Some(ColumnValue::Json(Value::String(s))) => Some(s.clone()),
        _ => None,
    }
}

#[async_trait::async_trait]
impl ColdStore for InMemoryColdStore {
    async fn insert(&self, batch: &[ColdRow]) -> Result<usize, ColdStoreError> {
        let reject = self.reject_per_batch.load(Ordering::SeqCst);
        let accepted = batch.len().saturating_sub(reject);

        let mut rows = self.rows.write().expect("cold store lock poisoned");
        rows.extend(batch.iter().take(accepted).cloned());
        Ok(accepted)
    }

    async fn fetch(&self, ids: Option<&[String]>) -> Result<Vec<ColdRow>, ColdStoreError> {
        let rows = self.rows.read().expect("cold store lock poisoned");
        let mut matched: Vec<ColdRow> = match ids {
            None => rows.clone(),
            Some(ids) => rows
                .iter()
                .filter(|r| log_id_of(r).is_some_and(|id| ids.contains(&id)))
                .cloned()
                .collect(),
        };
        matched.sort_by(|a, b| {
            let ts = |r: &ColdRow| match r.get("timestamp") {
                Some(ColumnValue::Timestamp(dt)) => Some(*dt),
                _ => None,
            };
            ts(b).cmp(&ts(a))
        });
        Ok(matched)
    }

    async fn delete(&self, ids: Option<&[String]>) -> Result<(), ColdStoreError> {
        let mut rows = self.rows.write().expect("cold store lock poisoned");
        match ids {
            None => rows.clear(),
            Some(ids) => rows.retain(|r| !log_id_of(r).is_some_and(|id| ids.contains(&id))),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::ColdRow;
    use chrono::Utc;

    fn row(id: &str) -> ColdRow {
        ColdRow::builder()
            .set("log_id", Value::String(id.to_string()))
            .set_timestamp("timestamp", Utc::now())
            .build()
    }

    #[tokio::test]
    async fn full_success_accepts_whole_batch() {
        let store = InMemoryColdStore::new();
        let batch = vec![row("a"), row("b")];
        assert_eq!(store.insert(&batch).await.unwrap(), 2);
        assert_eq!(store.row_count(), 2);
    }

    #[tokio::test]
    async fn partial_success_accepts_fewer_than_submitted() {
        let store = InMemoryColdStore::new();
        store.reject_per_batch(1);
        let batch = vec![row("a"), row("b"), row("c")];
        assert_eq!(store.insert(&batch).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn fetch_filters_by_id() {
        let store = InMemoryColdStore::new();
        store.insert(&[row("a"), row("b")]).await.unwrap();
        let fetched = store.fetch(Some(&["a".to_string()])).await.unwrap();
        assert_eq!(fetched.len(), 1);
    }
}

//! `IngestionPipeline`: admit → local-batch → stage → commit → evict (spec
//! §4.7). The orchestration shape mirrors a command-dispatcher's
//! load → decide → persist → publish stages (append → drain → commit →
//! evict here); threshold/failure semantics follow original_source
//! `logging/ingestion.py` exactly.

use std::sync::Arc;

use cold_store::{ColdStore, project_log_record};
use logcore::RecordId;
use logmodel::LogRecord;
use tracing::{error, instrument, warn};

use crate::local_batch::LocalBatch;
use staging_cache::StagingCache;

/// `local_threshold` / `stage_threshold` (spec §4.7). Defaults: drain on
/// every record, commit every ten staged entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub local_threshold: usize,
    pub stage_threshold: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            local_threshold: 1,
            stage_threshold: 10,
        }
    }
}

/// Orchestrates one tenant-stamped record through local batching, cross-
/// process staging, and the cold-store commit.
///
/// Per spec §5, a fresh instance is meant to be constructed per ingest
/// request — `LocalBatch` is therefore plain (unsynchronized) state, not an
/// `Arc<Mutex<_>>`. `StagingCache`/`ColdStore` are the shared, internally
/// synchronized adapters, held here behind `Arc` so many pipeline instances
/// can point at the same underlying cache/store.
pub struct IngestionPipeline<C: ?Sized, D: ?Sized> {
    local: LocalBatch,
    config: PipelineConfig,
    staging: Arc<C>,
    cold: Arc<D>,
}

impl<C, D> IngestionPipeline<C, D>
where
    C: StagingCache + ?Sized,
    D: ColdStore + ?Sized,
{
    pub fn new(staging: Arc<C>, cold: Arc<D>, config: PipelineConfig) -> Self {
        Self {
            local: LocalBatch::new(),
            config,
            staging,
            cold,
        }
    }

    pub fn local_len(&self) -> usize {
        self.local.len()
    }

    /// Step 1-7 of spec §4.7. Never fails the caller: adapter failures are
    /// logged and the record is returned unchanged (spec §7's propagation
    /// policy — the caller learns only whether the record was admitted).
    #[instrument(skip(self, record), fields(local_threshold = self.config.local_threshold, stage_threshold = self.config.stage_threshold))]
    pub async fn ingest(&mut self, record: LogRecord) -> LogRecord {
        self.local.append(record.clone());

        if self.local.len() >= self.config.local_threshold && !self.drain_local_to_stage().await {
            warn!(
                local_len = self.local.len(),
                "drain_local_to_stage failed; record remains in local batch for retry"
            );
            return record;
        }

        let staged = match self.staging.get_all().await {
            Ok(entries) => entries,
            Err(e) => {
                error!(error = %e, "failed to read staging cache size; deferring cold commit");
                return record;
            }
        };

        let n = staged.len();
        if n == 0 || n < self.config.stage_threshold {
            return record;
        }

        if !self.commit_stage_to_cold().await {
            warn!(n, "commit_stage_to_cold did not fully succeed; staging cache retained");
        }

        record
    }

    /// Move every record currently in `LocalBatch` into the `StagingCache`
    /// under a fresh `record_id`, in FIFO order.
    ///
    /// Stops at the first failing `put`, leaving that record and everything
    /// after it in `LocalBatch` for the next `ingest` call to retry (spec
    /// §4.7). Records already staged before the failure are *not* rolled
    /// back — they will be re-staged under a new id on retry, which is the
    /// accepted at-least-once/duplicate tradeoff (spec §9).
    #[instrument(skip(self))]
    pub async fn drain_local_to_stage(&mut self) -> bool {
        let snapshot = self.local.as_slice().to_vec();
        let mut staged = 0usize;

        for record in &snapshot {
            let record_id = RecordId::new();
            let value = match serde_json::to_value(record) {
                Ok(v) => v,
                Err(e) => {
                    error!(error = %e, "failed to serialize record for staging");
                    break;
                }
            };
            match self.staging.put(&record_id.to_string(), value).await {
                Ok(()) => staged += 1,
                Err(e) => {
                    error!(error = %e, %record_id, "staging cache put failed");
                    break;
                }
            }
        }

        if staged == snapshot.len() {
            self.local.snapshot_and_clear();
            true
        } else {
            self.local.drop_front(staged);
            false
        }
    }

    /// Snapshot the staging cache, insert it as one batch into `ColdStore`,
    /// and evict only on full success (spec §4.7).
    #[instrument(skip(self))]
    pub async fn commit_stage_to_cold(&self) -> bool {
        let snapshot = match self.staging.get_all().await {
            Ok(entries) => entries,
            Err(e) => {
                error!(error = %e, "failed to snapshot staging cache for commit");
                return false;
            }
        };

        let n = snapshot.len();
        if n == 0 {
            return true;
        }

        let mut batch = Vec::with_capacity(n);
        for (key, value) in &snapshot {
            let record: LogRecord = match serde_json::from_value(value.clone()) {
                Ok(r) => r,
                Err(e) => {
                    error!(error = %e, key, "staged entry is not a valid log record; skipping from batch");
                    continue;
                }
            };
            let tenant = match logmodel::extract_tenant(&record) {
                Some(t) => t,
                None => {
                    error!(key, "staged entry has no tenant stamp; skipping from batch");
                    continue;
                }
            };
            let record_id = key.parse::<RecordId>().unwrap_or_else(|_| RecordId::new());
            batch.push(project_log_record(record_id, &tenant, &record));
        }

        let inserted = match self.cold.insert(&batch).await {
            Ok(count) => count,
            Err(e) => {
                error!(error = %e, "cold store insert failed");
                0
            }
        };

        if inserted == n {
            match self.staging.delete_all().await {
                Ok(_) => true,
                Err(e) => {
                    error!(error = %e, "eviction after successful commit failed; duplicates possible on retry");
                    false
                }
            }
        } else {
            warn!(inserted, n, "partial cold store commit; staging cache not evicted");
            false
        }
    }
}

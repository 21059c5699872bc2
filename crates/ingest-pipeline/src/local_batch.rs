//! The per-pipeline-instance in-memory buffer of pending records (spec §4.6).

use logmodel::LogRecord;

/// Append-only accumulator of [`LogRecord`]s awaiting a drain to the
/// staging cache.
///
/// Not `Sync`: spec §5 requires this never be shared across threads. A
/// pipeline that chooses to share one instance across concurrent requests
/// must take its own lock around `append`/`snapshot_and_clear`.
#[derive(Debug, Default)]
pub struct LocalBatch {
    records: Vec<LogRecord>,
}

impl LocalBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: LogRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn as_slice(&self) -> &[LogRecord] {
        &self.records
    }

    /// Snapshot every pending record and empty the batch.
    pub fn snapshot_and_clear(&mut self) -> Vec<LogRecord> {
        std::mem::take(&mut self.records)
    }

    /// Drop the first `count` records, keeping the rest (FIFO order). Used
    /// by [`crate::IngestionPipeline::drain_local_to_stage`] to leave
    /// un-staged records behind after a partial drain failure.
    pub fn drop_front(&mut self, count: usize) {
        self.records.drain(..count);
    }
}

//! The tiered ingestion pipeline (spec §4.6-§4.7): the sole owner of the
//! admit → local-batch → stage → commit → evict orchestration and its
//! failure semantics.

mod local_batch;
mod pipeline;

#[cfg(test)]
mod integration_tests;

pub use local_batch::LocalBatch;
pub use pipeline::{IngestionPipeline, PipelineConfig};

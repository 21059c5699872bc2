//! `POST /logging/ingest` (spec §4.8): extract the authenticated tenant,
//! stamp it onto the record, and delegate to a fresh pipeline instance.

use std::sync::Arc;

use axum::extract::{Extension, State};
use axum::Json;
use serde_json::{json, Value};

use ingest_pipeline::IngestionPipeline;
use logcore::Tenant;
use logmodel::{stamp_tenant, LogRecord};

use crate::app::errors::ApiError;
use crate::app::AppState;

pub async fn ingest(
    State(state): State<AppState>,
    Extension(tenant): Extension<Tenant>,
    Json(raw): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let mut record: LogRecord =
        serde_json::from_value(raw).map_err(|e| ApiError::MalformedRequest(e.to_string()))?;

    stamp_tenant(&mut record, &tenant);

    let mut pipeline: IngestionPipeline<dyn staging_cache::StagingCache, dyn cold_store::ColdStore> =
        IngestionPipeline::new(
            Arc::clone(&state.staging),
            Arc::clone(&state.cold),
            state.pipeline_config,
        );

    let record = pipeline.ingest(record).await;

    let log_object = serde_json::to_value(&record)
        .map_err(|e| ApiError::MalformedRequest(e.to_string()))?;

    Ok(Json(json!({
        "message": "log ingested",
        "tenant": { "app_id": tenant.app_id.to_string(), "server_id": tenant.server_id.as_str() },
        "log_object": log_object,
    })))
}

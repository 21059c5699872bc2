//! HTTP application wiring (Axum router + adapter wiring).
//!
//! - `errors.rs`: consistent error responses
//! - `routes/`: HTTP routes + handlers (one file per concern)
//!
//! Only the `Authenticator`/`StagingCache`/`ColdStore` adapters are shared
//! `State` — each request builds its own [`ingest_pipeline::IngestionPipeline`]
//! (spec §5: "the handler must instantiate a fresh pipeline per request").

use std::sync::Arc;

use axum::Router;

use cold_store::ColdStore;
use ingest_pipeline::PipelineConfig;
use logauth::Authenticator;
use staging_cache::StagingCache;
use tenant_registry::TenantRegistry;

pub mod errors;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<Authenticator<Arc<dyn TenantRegistry>>>,
    pub staging: Arc<dyn StagingCache>,
    pub cold: Arc<dyn ColdStore>,
    pub pipeline_config: PipelineConfig,
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(state: AppState) -> Router {
    routes::router(state.clone()).with_state(state)
}

//! Route tree: one file per concern.

use axum::routing::{get, post};
use axum::Router;

use crate::app::AppState;
use crate::middleware::{self, AuthState};

pub mod export;
pub mod ingest;
pub mod system;

/// Routes gated by `X-API-Key` (spec §4.8 steps 1-2).
fn protected(state: AppState) -> Router<AppState> {
    let auth_state = AuthState {
        authenticator: state.authenticator.clone(),
    };

    Router::new()
        .route("/logging/ingest", post(ingest::ingest))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ))
}

/// Routes that validate their own query-param key (spec §6 fetch/export
/// surface uses a different key location/polarity than the ingest header).
fn export_routes() -> Router<AppState> {
    Router::new()
        .route("/logs/get", get(export::get_logs))
        .route("/logs/export", get(export::export_logs))
}

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(system::health))
        .merge(protected(state))
        .merge(export_routes())
}

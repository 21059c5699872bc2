//! Fetch/export surface (spec §6), grounded on original_source
//! `src/fetch/urls.py` for the query-param key aliasing and the
//! URL-decode-then-repair-spaces key handling, and on `log-export` for the
//! flatten/CSV rendering itself.
//!
//! Per spec §9's flagged bug, the auth check here rejects on an *invalid*
//! key (403) — the source's inverted polarity is not replicated.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use log_export::{flatten_row, to_csv};

use crate::app::errors::{json_error, ApiError};
use crate::app::AppState;

/// Base64 api keys may contain `+`, which a form-decoded query string turns
/// back into a literal space; undo that before handing the key to
/// `Authenticator::validate`.
fn repair_key(raw: &str) -> String {
    raw.replace(' ', "+")
}

fn extract_key(params: &HashMap<String, String>) -> Option<String> {
    params
        .get("apikey")
        .or_else(|| params.get("apiKey"))
        .map(|raw| repair_key(raw))
}

/// `GET /logs/get?apikey=…|apiKey=…` — all logs as flattened JSON.
pub async fn get_logs(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let key = extract_key(&params).ok_or(ApiError::AuthMissing)?;
    state
        .authenticator
        .validate(&key)
        .await
        .map_err(|_| ApiError::AuthInvalid)?;

    let rows = state
        .cold
        .fetch(None)
        .await
        .map_err(|e| ApiError::MalformedRequest(e.to_string()))?;

    let flat: Vec<_> = rows.iter().map(flatten_row).collect();
    Ok(Json(json!(flat)))
}

/// `GET /logs/export?...&log_id=<optional>` — all (or one) logs as a CSV
/// attachment.
pub async fn export_logs(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let key = match extract_key(&params) {
        Some(k) => k,
        None => return ApiError::AuthMissing.into_response(),
    };

    if state.authenticator.validate(&key).await.is_err() {
        return ApiError::AuthInvalid.into_response();
    }

    let ids = params.get("log_id").map(|id| vec![id.clone()]);
    let rows = match state.cold.fetch(ids.as_deref()).await {
        Ok(rows) => rows,
        Err(e) => {
            return json_error(StatusCode::BAD_REQUEST, "export_failed", &e.to_string());
        }
    };

    let flat: Vec<_> = rows.iter().map(flatten_row).collect();
    let csv_bytes = match to_csv(&flat) {
        Ok(bytes) => bytes,
        Err(e) => {
            return json_error(StatusCode::BAD_REQUEST, "export_failed", &e.to_string());
        }
    };

    (
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"logs.csv\""),
        ],
        csv_bytes,
    )
        .into_response()
}

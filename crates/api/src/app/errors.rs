//! Consistent error responses: a `{status, code, message}` envelope built
//! by `json_error`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// The HTTP-facing error kinds named in spec §7: `AuthMissing`,
/// `AuthInvalid`, `MalformedRequest`. `AdapterUnavailable`/`PartialCommit`
/// never reach this type — the pipeline swallows and logs them.
#[derive(Debug)]
pub enum ApiError {
    AuthMissing,
    AuthInvalid,
    MalformedRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::AuthMissing => (StatusCode::UNAUTHORIZED, "auth_missing", "missing API key".to_string()),
            ApiError::AuthInvalid => (StatusCode::FORBIDDEN, "auth_invalid", "invalid API key".to_string()),
            ApiError::MalformedRequest(msg) => (StatusCode::BAD_REQUEST, "malformed_request", msg),
        };
        json_error(status, code, &message)
    }
}

pub fn json_error(status: StatusCode, code: &str, message: &str) -> Response {
    (status, Json(json!({ "error": code, "message": message }))).into_response()
}

//! `X-API-Key` extraction and validation via `logauth::Authenticator`
//! (spec §4.8 steps 1-2).

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use logauth::Authenticator;
use tenant_registry::TenantRegistry;

use crate::app::errors::ApiError;

#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<Authenticator<Arc<dyn TenantRegistry>>>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let key = extract_api_key(req.headers()).ok_or(ApiError::AuthMissing)?;

    let tenant = state
        .authenticator
        .validate(&key)
        .await
        .map_err(|_| ApiError::AuthInvalid)?;

    req.extensions_mut().insert(tenant);

    Ok(next.run(req).await)
}

fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    let header = headers.get("X-API-Key")?;
    let value = header.to_str().ok()?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

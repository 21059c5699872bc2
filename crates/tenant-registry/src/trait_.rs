use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use logcore::{AppId, ServerId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("tenant registry unavailable: {0}")]
    Unavailable(String),
}

/// Read-only surface used by the Authenticator.
///
/// Every operation either returns data or fails with [`RegistryError`]; the
/// Authenticator treats any failure as "deny" and never propagates it.
#[async_trait::async_trait]
pub trait TenantRegistry: Send + Sync {
    async fn app_exists(&self, app_id: AppId) -> Result<bool, RegistryError>;
    async fn servers_of(&self, app_id: AppId) -> Result<HashSet<ServerId>, RegistryError>;
    async fn api_key_issued(&self, app_id: AppId, api_key: &str) -> Result<bool, RegistryError>;

    /// Record `(app_id, api_key)` as issued. Used by `Authenticator::issue`.
    async fn record_issued_key(&self, app_id: AppId, api_key: &str) -> Result<(), RegistryError>;
}

#[async_trait::async_trait]
impl<R> TenantRegistry for Arc<R>
where
    R: TenantRegistry + ?Sized,
{
    async fn app_exists(&self, app_id: AppId) -> Result<bool, RegistryError> {
        (**self).app_exists(app_id).await
    }

    async fn servers_of(&self, app_id: AppId) -> Result<HashSet<ServerId>, RegistryError> {
        (**self).servers_of(app_id).await
    }

    async fn api_key_issued(&self, app_id: AppId, api_key: &str) -> Result<bool, RegistryError> {
        (**self).api_key_issued(app_id, api_key).await
    }

    async fn record_issued_key(&self, app_id: AppId, api_key: &str) -> Result<(), RegistryError> {
        (**self).record_issued_key(app_id, api_key).await
    }
}

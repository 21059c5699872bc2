//! Postgres-backed `TenantRegistry`.

use std::collections::HashSet;
use std::sync::Arc;

use sqlx::PgPool;
use tracing::instrument;

use logcore::{AppId, ServerId};

use crate::trait_::{RegistryError, TenantRegistry};

#[derive(Debug, Clone)]
pub struct PostgresTenantRegistry {
    pool: Arc<PgPool>,
}

impl PostgresTenantRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RegistryError {
    RegistryError::Unavailable(format!("{operation}: {err}"))
}

#[async_trait::async_trait]
impl TenantRegistry for PostgresTenantRegistry {
    #[instrument(skip(self), fields(app_id = %app_id.as_uuid()), err)]
    async fn app_exists(&self, app_id: AppId) -> Result<bool, RegistryError> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM apps WHERE app_id = $1")
            .bind(app_id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("app_exists", e))?;
        Ok(row.is_some())
    }

    #[instrument(skip(self), fields(app_id = %app_id.as_uuid()), err)]
    async fn servers_of(&self, app_id: AppId) -> Result<HashSet<ServerId>, RegistryError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT server_id FROM apps WHERE app_id = $1")
                .bind(app_id.as_uuid())
                .fetch_all(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("servers_of", e))?;
        Ok(rows.into_iter().map(|(s,)| ServerId::new(s)).collect())
    }

    #[instrument(skip(self, api_key), fields(app_id = %app_id.as_uuid()), err)]
    async fn api_key_issued(&self, app_id: AppId, api_key: &str) -> Result<bool, RegistryError> {
        let row: Option<(i32,)> =
            sqlx::query_as("SELECT 1 FROM api_keys WHERE app_id = $1 AND api_key = $2")
                .bind(app_id.as_uuid())
                .bind(api_key)
                .fetch_optional(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("api_key_issued", e))?;
        Ok(row.is_some())
    }

    #[instrument(skip(self, api_key), fields(app_id = %app_id.as_uuid()), err)]
    async fn record_issued_key(&self, app_id: AppId, api_key: &str) -> Result<(), RegistryError> {
        sqlx::query("INSERT INTO api_keys (app_id, api_key) VALUES ($1, $2)")
            .bind(app_id.as_uuid())
            .bind(api_key)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("record_issued_key", e))?;
        Ok(())
    }
}

use std::sync::Arc;

use logauth::Authenticator;

#[tokio::main]
async fn main() {
    forgeerp_observability::init();

    let crypto_key = log_ingestion_api::config::aes_secret_key()
        .expect("AES_SECRET_KEY must be set to exactly 32 bytes");
    let crypto = Arc::new(logcrypto::Crypto::new(&crypto_key).expect("invalid crypto key"));

    let registry: Arc<dyn tenant_registry::TenantRegistry> =
        match log_ingestion_api::config::DbConfig::from_env() {
            Ok(db) => {
                let pool = sqlx::postgres::PgPoolOptions::new()
                    .connect(&db.connection_url())
                    .await
                    .expect("failed to connect to the tenant registry database");
                Arc::new(tenant_registry::PostgresTenantRegistry::new(pool))
            }
            Err(e) => {
                tracing::warn!(error = %e, "relational DB_* env vars not set; using in-memory tenant registry");
                Arc::new(tenant_registry::InMemoryTenantRegistry::new())
            }
        };

    let authenticator = Arc::new(Authenticator::new(crypto, registry));

    #[cfg(feature = "redis-backend")]
    let staging: Arc<dyn staging_cache::StagingCache> = {
        let cfg = log_ingestion_api::config::StagingCacheConfig::from_env()
            .expect("REDIS_HOST/REDIS_PORT must be set when built with redis-backend");
        Arc::new(
            staging_cache::RedisStagingCache::new(cfg.connection_url())
                .expect("failed to construct the redis staging cache client"),
        )
    };
    #[cfg(not(feature = "redis-backend"))]
    let staging: Arc<dyn staging_cache::StagingCache> =
        Arc::new(staging_cache::InMemoryStagingCache::new());

    #[cfg(feature = "clickhouse-backend")]
    let cold: Arc<dyn cold_store::ColdStore> = {
        let cfg = log_ingestion_api::config::ColdStoreConfig::from_env()
            .expect("CLICKHOUSE_HOST/CLICKHOUSE_USERNAME/CLICKHOUSE_PASSWORD must be set when built with clickhouse-backend");
        Arc::new(cold_store::ClickHouseColdStore::new(
            &cfg.host,
            &cfg.username,
            &cfg.password,
            cfg.secure,
        ))
    };
    #[cfg(not(feature = "clickhouse-backend"))]
    let cold: Arc<dyn cold_store::ColdStore> = Arc::new(cold_store::InMemoryColdStore::new());

    let state = log_ingestion_api::app::AppState {
        authenticator,
        staging,
        cold,
        pipeline_config: ingest_pipeline::PipelineConfig::default(),
    };

    let app = log_ingestion_api::app::build_app(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("failed to bind 0.0.0.0:8080");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}

//! Idempotent DDL for the relational tenant-registry schema (spec §6),
//! kept as a callable function rather than a standalone binary so an
//! operator can run it from a one-off task or an init container.

use sqlx::PgPool;

/// Create `servers`, `apps`, `api_keys` if they do not already exist.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS servers (
            server_id VARCHAR(255) PRIMARY KEY,
            server_name VARCHAR(255) UNIQUE NOT NULL,
            server_description TEXT,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS apps (
            app_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            app_serial SERIAL UNIQUE NOT NULL,
            app_name VARCHAR(255) UNIQUE NOT NULL,
            app_description TEXT,
            server_id VARCHAR(255) NOT NULL REFERENCES servers(server_id),
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS api_keys (
            app_id UUID NOT NULL REFERENCES apps(app_id),
            api_key TEXT NOT NULL,
            issued_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

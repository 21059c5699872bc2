//! Idempotent DDL for the columnar `logs` table (spec §6), bit-exact with
//! original_source `db/clickhouse/initialise.py::create_logs_table`.
//!
//! The distilled spec treats this as an out-of-band initialization utility;
//! this workspace keeps it as a callable function in the adapter crate that
//! owns the schema, rather than a standalone binary.

#[cfg(feature = "clickhouse-backend")]
use clickhouse::Client;

const CREATE_LOGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS logs (
    log_id UUID DEFAULT generateUUIDv4(),
    app_id UUID NOT NULL,

    timestamp DateTime DEFAULT now(),
    event_type Nullable(String),
    event_name Nullable(String),
    event_category Nullable(String),

    hostname Nullable(String),
    portnumber Nullable(Int32),
    api_key Nullable(String),

    severity_level Nullable(String),
    status_code Nullable(Int32),
    session_id Nullable(String),
    request_id Nullable(String),
    success_flag Nullable(Boolean),

    message Nullable(String),
    description Nullable(String),
    diagnostics Nullable(String),
    source Nullable(JSON)
) ENGINE = MergeTree()
ORDER BY (timestamp)
"#;

/// Create the `logs` table if it does not already exist.
#[cfg(feature = "clickhouse-backend")]
pub async fn init_schema(client: &Client) -> Result<(), clickhouse::error::Error> {
    client.query(CREATE_LOGS_TABLE).execute().await
}

/// The DDL this module issues, exposed for callers that provision the
/// table through a different client (migration tooling, tests).
pub fn create_logs_table_ddl() -> &'static str {
    CREATE_LOGS_TABLE
}

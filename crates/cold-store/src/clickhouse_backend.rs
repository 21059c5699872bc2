//! ClickHouse-backed `ColdStore`.
//!
//! `fetch`/`delete` use the `clickhouse` crate's typed `Row` deserialization
//! (grounded on `other_examples/.../caibirdme-ltbridge__src-storage-ck-log.rs`'s
//! `Client::query(..).fetch::<T>()` / cursor pattern) because the `logs`
//! table's column set is bit-exact and fixed (spec §6). `insert` instead
//! composes a raw multi-row `INSERT INTO logs (...) VALUES (...), ...`
//! statement via `Client::query(&sql).execute()`, because the batch being
//! inserted is genuinely heterogeneous (union-of-keys, missing → `NULL`) —
//! mirroring original_source `db/clickhouse/services.py::insert_log`
//! faithfully rather than forcing a fixed-shape `Row` derive onto a
//! variable-shape write path.

use chrono::{DateTime, Utc};
use clickhouse::{Client, Row};
use serde::Deserialize;
use tracing::instrument;

use crate::row::{ColdRow, ColumnValue};
use crate::sql_literal::to_sql_literal;
use crate::trait_::{ColdStore, ColdStoreError};

#[derive(Clone)]
pub struct ClickHouseColdStore {
    client: Client,
}

impl ClickHouseColdStore {
    pub fn new(host: &str, username: &str, password: &str, secure: bool) -> Self {
        let url = if secure {
            format!("https://{host}")
        } else {
            format!("http://{host}")
        };
        let client = Client::default()
            .with_url(url)
            .with_user(username)
            .with_password(password)
            .with_database("default");
        Self { client }
    }
}

#[async_trait::async_trait]
impl ColdStore for ClickHouseColdStore {
    #[instrument(skip(self, batch), fields(batch_len = batch.len()), err)]
    async fn insert(&self, batch: &[ColdRow]) -> Result<usize, ColdStoreError> {
        if batch.is_empty() {
            return Ok(0);
        }

        let mut columns: Vec<&str> = batch
            .iter()
            .flat_map(|row| row.columns().keys().map(|s| s.as_str()))
            .collect();
        columns.sort_unstable();
        columns.dedup();

        let values_rows: Vec<String> = batch
            .iter()
            .map(|row| {
                let literals: Vec<String> = columns
                    .iter()
                    .map(|col| match row.get(col) {
                        Some(value) => to_sql_literal(value),
                        None => to_sql_literal(&ColumnValue::Json(serde_json::Value::Null)),
                    })
                    .collect();
                format!("({})", literals.join(", "))
            })
            .collect();

        let sql = format!(
            "INSERT INTO logs ({}) VALUES {}",
            columns.join(", "),
            values_rows.join(", ")
        );

        self.client
            .query(&sql)
            .execute()
            .await
            .map_err(|e| ColdStoreError::Unavailable(e.to_string()))?;

        Ok(batch.len())
    }

    #[instrument(skip(self), err)]
    async fn fetch(&self, ids: Option<&[String]>) -> Result<Vec<ColdRow>, ColdStoreError> {
        let sql = match ids {
            None => "SELECT * FROM logs ORDER BY timestamp DESC".to_string(),
            Some(ids) => {
                let quoted: Vec<String> = ids.iter().map(|id| format!("'{id}'")).collect();
                format!(
                    "SELECT * FROM logs WHERE log_id IN ({}) ORDER BY timestamp DESC",
                    quoted.join(", ")
                )
            }
        };

        let mut cursor = self
            .client
            .query(&sql)
            .fetch::<LogsTableRow>()
            .map_err(|e| ColdStoreError::Unavailable(e.to_string()))?;

        let mut out = Vec::new();
        while let Some(row) = cursor
            .next()
            .await
            .map_err(|e| ColdStoreError::Unavailable(e.to_string()))?
        {
            out.push(row.into_cold_row());
        }
        Ok(out)
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, ids: Option<&[String]>) -> Result<(), ColdStoreError> {
        let sql = match ids {
            None => "TRUNCATE TABLE logs".to_string(),
            Some(ids) => {
                let quoted: Vec<String> = ids.iter().map(|id| format!("'{id}'")).collect();
                format!("ALTER TABLE logs DELETE WHERE log_id IN ({})", quoted.join(", "))
            }
        };

        self.client
            .query(&sql)
            .execute()
            .await
            .map_err(|e| ColdStoreError::Unavailable(e.to_string()))
    }
}

/// Fixed-shape row matching the bit-exact `logs` schema (spec §6), used only
/// for reads — the schema itself is not heterogeneous, only which columns a
/// given insert batch happens to populate.
#[derive(Debug, Row, Deserialize)]
struct LogsTableRow {
    log_id: String,
    app_id: String,
    timestamp: DateTime<Utc>,
    event_type: Option<String>,
    event_name: Option<String>,
    event_category: Option<String>,
    hostname: Option<String>,
    portnumber: Option<i32>,
    api_key: Option<String>,
    severity_level: Option<String>,
    status_code: Option<i32>,
    session_id: Option<String>,
    request_id: Option<String>,
    success_flag: Option<bool>,
    message: Option<String>,
    description: Option<String>,
    diagnostics: Option<String>,
    source: Option<String>,
}

impl LogsTableRow {
    fn into_cold_row(self) -> ColdRow {
        let mut builder = ColdRow::builder()
            .set("log_id", serde_json::Value::String(self.log_id))
            .set("app_id", serde_json::Value::String(self.app_id))
            .set_timestamp("timestamp", self.timestamp);

        builder = builder
            .set_opt("event_type", self.event_type.map(serde_json::Value::String))
            .set_opt("event_name", self.event_name.map(serde_json::Value::String))
            .set_opt(
                "event_category",
                self.event_category.map(serde_json::Value::String),
            )
            .set_opt("hostname", self.hostname.map(serde_json::Value::String))
            .set_opt("portnumber", self.portnumber.map(serde_json::Value::from))
            .set_opt("api_key", self.api_key.map(serde_json::Value::String))
            .set_opt(
                "severity_level",
                self.severity_level.map(serde_json::Value::String),
            )
            .set_opt("status_code", self.status_code.map(serde_json::Value::from))
            .set_opt("session_id", self.session_id.map(serde_json::Value::String))
            .set_opt("request_id", self.request_id.map(serde_json::Value::String))
            .set_opt("success_flag", self.success_flag.map(serde_json::Value::from))
            .set_opt("message", self.message.map(serde_json::Value::String))
            .set_opt("description", self.description.map(serde_json::Value::String));

        if let Some(diagnostics) = self.diagnostics {
            if let Ok(parsed) = serde_json::from_str(&diagnostics) {
                builder = builder.set("diagnostics", parsed);
            } else {
                builder = builder.set("diagnostics", serde_json::Value::String(diagnostics));
            }
        }
        if let Some(source) = self.source {
            if let Ok(parsed) = serde_json::from_str(&source) {
                builder = builder.set("source", parsed);
            } else {
                builder = builder.set("source", serde_json::Value::String(source));
            }
        }

        builder.build()
    }
}

//! `ColdRow`: the flattened projection of a `LogRecord` stored in the
//! columnar `logs` table (spec §6).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use logcore::{RecordId, Tenant};
use serde_json::Value;

/// A single column value, kept distinct from plain JSON so the SQL-literal
/// encoder can apply the timestamp rule (ISO-8601, seconds precision)
/// without reparsing a string.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Timestamp(DateTime<Utc>),
    Json(Value),
}

/// The bit-exact `logs` table row (spec §6): `log_id`, `app_id`, `timestamp`,
/// classification, `server_info`/`request_info`/`message_info` fields, and
/// `diagnostics`/`source`. Only columns with a present value are populated;
/// [`ColdStore::insert`](crate::ColdStore::insert) computes the union of
/// keys across a batch and emits `NULL` for anything a given row omits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColdRow {
    columns: BTreeMap<String, ColumnValue>,
}

impl ColdRow {
    pub fn builder() -> ColdRowBuilder {
        ColdRowBuilder::default()
    }

    pub fn columns(&self) -> &BTreeMap<String, ColumnValue> {
        &self.columns
    }

    pub fn get(&self, column: &str) -> Option<&ColumnValue> {
        self.columns.get(column)
    }
}

#[derive(Default)]
pub struct ColdRowBuilder {
    columns: BTreeMap<String, ColumnValue>,
}

impl ColdRowBuilder {
    pub fn set_timestamp(mut self, column: &str, value: DateTime<Utc>) -> Self {
        self.columns
            .insert(column.to_string(), ColumnValue::Timestamp(value));
        self
    }

    /// Set a column if `value` is `Some`; omits the column entirely on
    /// `None` (left for the batch-level union to fill with `NULL`).
    pub fn set_opt(mut self, column: &str, value: Option<Value>) -> Self {
        if let Some(v) = value {
            self.columns.insert(column.to_string(), ColumnValue::Json(v));
        }
        self
    }

    pub fn set(mut self, column: &str, value: Value) -> Self {
        self.columns.insert(column.to_string(), ColumnValue::Json(value));
        self
    }

    pub fn build(self) -> ColdRow {
        ColdRow { columns: self.columns }
    }
}

/// Project a record id, authenticated tenant, and stamped `LogRecord`'s
/// nested sections into a `ColdRow`. Lives here (rather than in `logmodel`)
/// because the column set is `cold-store`'s concern, not the wire model's.
///
/// Per spec §9's flagged behavior: `app_id` is copied explicitly from the
/// authenticated tenant rather than left for the record to (inconsistently)
/// supply. `log_id` is likewise stamped from `record_id` rather than left to
/// the store's own UUID default — see DESIGN.md for the tradeoff.
pub fn project_log_record(
    record_id: RecordId,
    tenant: &Tenant,
    record: &logmodel::LogRecord,
) -> ColdRow {
    let mut builder = ColdRow::builder()
        .set("log_id", Value::String(record_id.to_string()))
        .set("app_id", Value::String(tenant.app_id.to_string()))
        .set_timestamp("timestamp", record.timestamp)
        .set_opt("event_type", record.event_type.clone().map(Value::String))
        .set_opt("event_name", record.event_name.clone().map(Value::String))
        .set_opt(
            "event_category",
            record.event_category.clone().map(Value::String),
        );

    if let Some(server_info) = &record.server_info {
        builder = builder
            .set_opt("hostname", server_info.hostname.clone().map(Value::String))
            .set_opt("portnumber", server_info.port.map(|p| Value::from(p)))
            .set_opt("api_key", server_info.api_key.clone().map(Value::String));
    }

    if let Some(request_info) = &record.request_info {
        builder = builder
            .set_opt(
                "severity_level",
                request_info.severity_level.clone().map(Value::String),
            )
            .set_opt("status_code", request_info.status_code.map(Value::from))
            .set_opt(
                "session_id",
                request_info.session_id.clone().map(Value::String),
            )
            .set_opt(
                "request_id",
                request_info.request_id.clone().map(Value::String),
            )
            .set_opt("success_flag", request_info.success_flag.map(Value::from));
    }

    if let Some(message_info) = &record.message_info {
        builder = builder
            .set_opt("message", message_info.message.clone().map(Value::String))
            .set_opt(
                "description",
                message_info.description.clone().map(Value::String),
            );
    }

    if let Some(source_info) = &record.source_info {
        if !json_is_empty_object(&source_info.diagnostics) {
            builder = builder.set("diagnostics", source_info.diagnostics.clone());
        }
        if !json_is_empty_object(&source_info.source) {
            builder = builder.set("source", source_info.source.clone());
        }
    }

    builder.build()
}

fn json_is_empty_object(value: &Value) -> bool {
    matches!(value, Value::Object(map) if map.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use logcore::{AppId, ServerId};
    use logmodel::LogRecord;

    #[test]
    fn projects_tenant_app_id_into_app_id_column_explicitly() {
        let tenant = Tenant::new(AppId::new(), ServerId::new("srv-1"));
        let record = LogRecord::new();
        let row = project_log_record(RecordId::new(), &tenant, &record);

        assert_eq!(
            row.get("app_id"),
            Some(&ColumnValue::Json(Value::String(tenant.app_id.to_string())))
        );
    }

    #[test]
    fn omits_absent_sections_entirely() {
        let tenant = Tenant::new(AppId::new(), ServerId::new("srv-1"));
        let record = LogRecord::new();
        let row = project_log_record(RecordId::new(), &tenant, &record);

        assert!(row.get("hostname").is_none());
        assert!(row.get("message").is_none());
    }
}

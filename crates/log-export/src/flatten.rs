//! One-level flattening of a stored log row, grounded on original_source
//! `src/fetch/fetch_logs.py::_flatten_column`: nested object columns
//! (`diagnostics`, `source`) are expanded into their own top-level keys;
//! a value that is itself still an object is stringified (as JSON text)
//! rather than expanded further.

use std::collections::BTreeMap;

use cold_store::{ColdRow, ColumnValue};
use serde_json::Value;

/// A flattened row: column name → JSON value, ready for JSON serialization
/// or CSV cell rendering.
pub type FlatRow = BTreeMap<String, Value>;

const NESTED_COLUMNS: [&str; 2] = ["diagnostics", "source"];

/// Flatten one stored row by one level (spec §6's fetch/export surface).
///
/// `diagnostics` and `source` are the only JSON-typed columns in the `logs`
/// schema (spec §6); if either holds a JSON object, its keys are promoted
/// to top-level columns, and any value that is itself an object is
/// stringified so the result stays one level flat. Every other column
/// passes through unchanged.
pub fn flatten_row(row: &ColdRow) -> FlatRow {
    let mut out = FlatRow::new();

    for (column, value) in row.columns() {
        let json = match value {
            ColumnValue::Timestamp(dt) => Value::String(dt.to_rfc3339()),
            ColumnValue::Json(v) => v.clone(),
        };

        if NESTED_COLUMNS.contains(&column.as_str()) {
            if let Value::Object(map) = &json {
                for (key, nested_value) in map {
                    let flat_value = match nested_value {
                        Value::Object(_) => Value::String(nested_value.to_string()),
                        other => other.clone(),
                    };
                    out.insert(key.clone(), flat_value);
                }
                continue;
            }
        }

        out.insert(column.clone(), json);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn expands_source_object_into_top_level_keys() {
        let row = ColdRow::builder()
            .set("log_id", json!("abc"))
            .set_timestamp("timestamp", Utc::now())
            .set(
                "source",
                json!({"tenant": {"app_id": "a", "server_id": "s"}, "sdk": "rust"}),
            )
            .build();

        let flat = flatten_row(&row);
        assert_eq!(flat.get("sdk"), Some(&json!("rust")));
        assert!(flat.get("source").is_none());
        // Nested object (tenant) is stringified rather than expanded again.
        assert!(matches!(flat.get("tenant"), Some(Value::String(_))));
    }

    #[test]
    fn leaves_non_nested_columns_untouched() {
        let row = ColdRow::builder()
            .set("message", json!("hello"))
            .set("status_code", json!(200))
            .build();

        let flat = flatten_row(&row);
        assert_eq!(flat.get("message"), Some(&json!("hello")));
        assert_eq!(flat.get("status_code"), Some(&json!(200)));
    }

    #[test]
    fn scalar_source_column_passes_through_as_is() {
        let row = ColdRow::builder().set("source", json!("legacy")).build();
        let flat = flatten_row(&row);
        assert_eq!(flat.get("source"), Some(&json!("legacy")));
    }
}

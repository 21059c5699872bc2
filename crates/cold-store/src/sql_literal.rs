//! SQL literal encoding (spec §4.5), grounded on original_source
//! `utils/utils.py::_to_sql_literal`.
//!
//! Required because [`ClickHouseColdStore::insert`](crate::ClickHouseColdStore)
//! composes a raw multi-row `INSERT` statement over a genuinely
//! heterogeneous batch rather than a fixed-shape typed `Row`.

use serde_json::Value;

use crate::row::ColumnValue;

/// Encode a single column value as a SQL literal:
/// `null → NULL`; nested mapping/sequence → JSON text (quoted + escaped);
/// timestamp → ISO-8601, seconds precision (quoted + escaped); everything
/// else → quoted string with `\` and `'` escaped.
pub fn to_sql_literal(value: &ColumnValue) -> String {
    match value {
        ColumnValue::Timestamp(dt) => quote(&dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        ColumnValue::Json(json) => json_literal(json),
    }
}

fn json_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Object(_) | Value::Array(_) => {
            quote(&serde_json::to_string(value).expect("Value always serializes"))
        }
        Value::String(s) => quote(s),
        other => quote(&other.to_string()),
    }
}

fn quote(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn null_becomes_null_literal() {
        assert_eq!(to_sql_literal(&ColumnValue::Json(Value::Null)), "NULL");
    }

    #[test]
    fn object_becomes_quoted_json_text() {
        let v = ColumnValue::Json(json!({"tenant": {"app_id": "a"}}));
        assert_eq!(
            to_sql_literal(&v),
            "'{\"tenant\":{\"app_id\":\"a\"}}'"
        );
    }

    #[test]
    fn string_is_quoted_and_escaped() {
        let v = ColumnValue::Json(json!("O'Brien\\path"));
        assert_eq!(to_sql_literal(&v), "'O\\'Brien\\\\path'");
    }

    #[test]
    fn number_and_bool_are_quoted_too() {
        assert_eq!(to_sql_literal(&ColumnValue::Json(json!(8080))), "'8080'");
        assert_eq!(to_sql_literal(&ColumnValue::Json(json!(true))), "'true'");
    }

    #[test]
    fn timestamp_is_iso8601_seconds_precision() {
        let dt = chrono::Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            to_sql_literal(&ColumnValue::Timestamp(dt)),
            "'2026-01-02 03:04:05'"
        );
    }
}

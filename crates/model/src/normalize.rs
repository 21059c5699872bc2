//! Normalization of open JSON sections (spec §3 invariant 2).

use serde_json::{Map, Value};

/// Coerce a JSON value into an object.
///
/// Objects pass through unchanged. Any other shape (scalar, array, null) is
/// wrapped as `{"_source": <value>}`, matching the "scalars placed where an
/// object is expected are wrapped" invariant.
pub fn to_object(value: &Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map.clone(),
        other => {
            let mut wrapped = Map::new();
            wrapped.insert("_source".to_string(), other.clone());
            wrapped
        }
    }
}

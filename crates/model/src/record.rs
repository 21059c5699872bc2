//! `LogRecord` and its nested sections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `{hostname, port, api_key}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub port: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub api_key: Option<String>,
}

/// `{severity_level, status_code, session_id, request_id, request_type, success_flag}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestInfo {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub severity_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub session_id: Option<String>,
    /// Unique per spec §3 invariant 1. Auto-filled by [`RequestInfo::ensure_request_id`]
    /// if the caller did not supply one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub request_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub success_flag: Option<bool>,
}

impl RequestInfo {
    /// Auto-fill `request_id` if absent (spec §3 invariant 1).
    pub fn ensure_request_id(&mut self) {
        if self.request_id.is_none() {
            self.request_id = Some(uuid::Uuid::now_v7().to_string());
        }
    }
}

/// `{message, description}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageInfo {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

/// `{diagnostics: mapping<string, any>, source: mapping<string, any>}`.
///
/// Both fields are open JSON values on the wire: a caller may legally submit
/// a scalar where an object is expected (spec §3 invariant 2). Normalization
/// (see [`crate::normalize`]) wraps such scalars as `{"_source": <value>}`
/// before the record is staged or committed; this struct preserves whatever
/// shape the caller actually sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    #[serde(default = "empty_object")]
    pub diagnostics: Value,
    #[serde(default = "empty_object")]
    pub source: Value,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// A structured event submitted by a tenant.
///
/// Every field other than `timestamp` is optional; `timestamp` always has a
/// value (either caller-supplied or defaulted to wall-clock at construction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub event_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub event_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub server_info: Option<ServerInfo>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub request_info: Option<RequestInfo>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message_info: Option<MessageInfo>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source_info: Option<SourceInfo>,

    /// Forward-compatible open fields not covered by a named section.
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl Default for LogRecord {
    fn default() -> Self {
        Self {
            timestamp: Utc::now(),
            event_type: None,
            event_name: None,
            event_category: None,
            version: None,
            server_info: None,
            request_info: None,
            message_info: None,
            source_info: None,
            extra: Map::new(),
        }
    }
}

impl LogRecord {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_timestamp_to_now_on_construction() {
        let before = Utc::now();
        let record = LogRecord::new();
        assert!(record.timestamp >= before);
    }

    #[test]
    fn request_id_is_auto_filled_once() {
        let mut info = RequestInfo::default();
        assert!(info.request_id.is_none());
        info.ensure_request_id();
        let first = info.request_id.clone();
        info.ensure_request_id();
        assert_eq!(info.request_id, first);
    }

    #[test]
    fn preserves_explicit_request_id() {
        let mut info = RequestInfo {
            request_id: Some("caller-supplied".to_string()),
            ..Default::default()
        };
        info.ensure_request_id();
        assert_eq!(info.request_id.as_deref(), Some("caller-supplied"));
    }

    #[test]
    fn deserializes_minimal_record() {
        let record: LogRecord = serde_json::from_str(r#"{"event_name":"login"}"#).unwrap();
        assert_eq!(record.event_name.as_deref(), Some("login"));
        assert!(record.server_info.is_none());
    }
}

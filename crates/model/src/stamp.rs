//! Tenant-stamping: the last thing the handler does to a record before it
//! reaches the pipeline (spec §4.8 steps 3-4).

use logcore::{AppId, ServerId, Tenant};
use serde_json::{Map, Value, json};

use crate::normalize;
use crate::record::{LogRecord, SourceInfo};

/// Stamp `record` with the authenticated tenant.
///
/// - Ensures `source_info.source` exists as a mapping; a non-mapping value is
///   wrapped as `{"_source": <value>}` first (spec §3 invariant 2).
/// - Inserts `tenant = {app_id, server_id}` into `source_info.source`.
/// - Copies `server_info.{hostname, port}` into `source_info.source.server`
///   and `request_info.{request_id, request_type, session_id}` into
///   `source_info.diagnostics.request`, when present. This duplication is
///   intentional (spec §4.8 step 4) to simplify downstream flattening.
/// - Auto-fills `request_info.request_id` when a `request_info` section is
///   present but omitted it (spec §3 invariant 1).
pub fn stamp_tenant(record: &mut LogRecord, tenant: &Tenant) {
    if let Some(request_info) = &mut record.request_info {
        request_info.ensure_request_id();
    }

    let source_info = record.source_info.get_or_insert_with(SourceInfo::default);

    let mut source_obj = normalize::to_object(&source_info.source);
    source_obj.insert(
        "tenant".to_string(),
        json!({
            "app_id": tenant.app_id.as_uuid().to_string(),
            "server_id": tenant.server_id.as_str(),
        }),
    );

    if let Some(server_info) = &record.server_info {
        let mut server_obj = Map::new();
        if let Some(hostname) = &server_info.hostname {
            server_obj.insert("hostname".to_string(), json!(hostname));
        }
        if let Some(port) = server_info.port {
            server_obj.insert("port".to_string(), json!(port));
        }
        if !server_obj.is_empty() {
            source_obj.insert("server".to_string(), Value::Object(server_obj));
        }
    }
    source_info.source = Value::Object(source_obj);

    if let Some(request_info) = &record.request_info {
        let mut request_obj = Map::new();
        if let Some(request_id) = &request_info.request_id {
            request_obj.insert("request_id".to_string(), json!(request_id));
        }
        if let Some(request_type) = &request_info.request_type {
            request_obj.insert("request_type".to_string(), json!(request_type));
        }
        if let Some(session_id) = &request_info.session_id {
            request_obj.insert("session_id".to_string(), json!(session_id));
        }
        if !request_obj.is_empty() {
            let mut diagnostics_obj = normalize::to_object(&source_info.diagnostics);
            diagnostics_obj.insert("request".to_string(), Value::Object(request_obj));
            source_info.diagnostics = Value::Object(diagnostics_obj);
        }
    }
}

/// Recover the stamped tenant from `source_info.source.tenant` (spec §3
/// invariant 3: always present after [`stamp_tenant`]). Used when a staged
/// record is read back out of the `StagingCache` for cold-store projection,
/// where only the serialized record (not a separate `Tenant` value) is on
/// hand.
pub fn extract_tenant(record: &LogRecord) -> Option<Tenant> {
    let source = &record.source_info.as_ref()?.source;
    let tenant = source.get("tenant")?;
    let app_id: AppId = tenant.get("app_id")?.as_str()?.parse().ok()?;
    let server_id = ServerId::new(tenant.get("server_id")?.as_str()?);
    Some(Tenant::new(app_id, server_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RequestInfo, ServerInfo};
    use logcore::{AppId, ServerId};

    fn tenant() -> Tenant {
        Tenant::new(AppId::new(), ServerId::new("srv-1"))
    }

    #[test]
    fn stamps_tenant_into_missing_source_info() {
        let mut record = LogRecord::new();
        let tenant = tenant();
        stamp_tenant(&mut record, &tenant);

        let source = record.source_info.unwrap().source;
        assert_eq!(
            source["tenant"]["server_id"],
            Value::String("srv-1".to_string())
        );
    }

    #[test]
    fn wraps_scalar_source_before_stamping() {
        let mut record = LogRecord::new();
        record.source_info = Some(SourceInfo {
            diagnostics: Value::Object(Map::new()),
            source: Value::String("legacy-scalar".to_string()),
        });
        stamp_tenant(&mut record, &tenant());

        let source = record.source_info.unwrap().source;
        assert_eq!(source["_source"], json!("legacy-scalar"));
        assert!(source.get("tenant").is_some());
    }

    #[test]
    fn duplicates_server_and_request_info_for_flattening() {
        let mut record = LogRecord::new();
        record.server_info = Some(ServerInfo {
            hostname: Some("host-a".to_string()),
            port: Some(8080),
            api_key: None,
        });
        record.request_info = Some(RequestInfo {
            request_id: Some("req-1".to_string()),
            request_type: Some("http".to_string()),
            ..Default::default()
        });

        stamp_tenant(&mut record, &tenant());

        let source_info = record.source_info.unwrap();
        assert_eq!(source_info.source["server"]["hostname"], json!("host-a"));
        assert_eq!(source_info.source["server"]["port"], json!(8080));
        assert_eq!(
            source_info.diagnostics["request"]["request_id"],
            json!("req-1")
        );
    }

    #[test]
    fn auto_fills_missing_request_id_when_request_info_present() {
        let mut record = LogRecord::new();
        record.request_info = Some(RequestInfo {
            request_type: Some("http".to_string()),
            ..Default::default()
        });

        stamp_tenant(&mut record, &tenant());

        assert!(record.request_info.unwrap().request_id.is_some());
    }

    #[test]
    fn leaves_request_id_untouched_when_request_info_is_absent() {
        let mut record = LogRecord::new();
        stamp_tenant(&mut record, &tenant());
        assert!(record.request_info.is_none());
    }

    #[test]
    fn extract_tenant_recovers_what_stamp_tenant_wrote() {
        let mut record = LogRecord::new();
        let tenant = tenant();
        stamp_tenant(&mut record, &tenant);

        assert_eq!(extract_tenant(&record), Some(tenant));
    }

    #[test]
    fn extract_tenant_is_none_for_an_unstamped_record() {
        assert_eq!(extract_tenant(&LogRecord::new()), None);
    }
}

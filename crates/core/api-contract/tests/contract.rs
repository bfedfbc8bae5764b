use api_contract::{AlertQuery, ConnectionStatusDto, DashboardDto, DeviceSummaryDto};
use domain::{AlertEvent, TelemetryReading};
use serde_json::{Value, json};

#[test]
fn status_is_camel_case_and_omits_idle_backoff() {
    let status = ConnectionStatusDto {
        enabled: true,
        connected: false,
        state: "reconnect_waiting".to_string(),
        backoff_ms: Some(2000),
    };
    let value = serde_json::to_value(status).expect("serialize");
    assert_eq!(value.get("backoffMs"), Some(&json!(2000)));
    assert!(value.get("backoff_ms").is_none());

    let status = ConnectionStatusDto {
        enabled: false,
        connected: false,
        state: "idle".to_string(),
        backoff_ms: None,
    };
    let value = serde_json::to_value(status).expect("serialize");
    assert!(value.get("backoffMs").is_none());
}

#[test]
fn device_summary_embeds_reading() {
    let summary = DeviceSummaryDto {
        device_id: "dev-1".to_string(),
        count: 3,
        latest: Some(TelemetryReading::new("dev-1", 1000).with_sensor("temp", 21.5)),
    };
    let value = serde_json::to_value(summary).expect("serialize");
    assert_eq!(value["deviceId"], json!("dev-1"));
    assert_eq!(value["latest"]["sensors"]["temp"], json!(21.5));
}

#[test]
fn alert_query_accepts_both_device_id_spellings() {
    let query: AlertQuery =
        serde_json::from_str(r#"{"deviceId":"dev-1","limit":5}"#).expect("parse");
    assert_eq!(query.device_id.as_deref(), Some("dev-1"));
    assert_eq!(query.limit, Some(5));

    let query: AlertQuery = serde_json::from_str(r#"{"device_id":"dev-2"}"#).expect("parse");
    assert_eq!(query.device_id.as_deref(), Some("dev-2"));
    assert!(query.severity.is_none());
}

#[test]
fn dashboard_last_alert_is_null_when_empty() {
    let dashboard = DashboardDto {
        device_count: 0,
        total_alerts: 0,
        last_alert: None,
        recent: Vec::new(),
    };
    let value = serde_json::to_value(dashboard).expect("serialize");
    assert_eq!(value["lastAlert"], Value::Null);
    assert_eq!(value["recent"], json!([]));

    let dashboard = DashboardDto {
        device_count: 1,
        total_alerts: 1,
        last_alert: Some(AlertEvent::new("dev-1").with_ts(5).with_message("flame")),
        recent: Vec::new(),
    };
    let value = serde_json::to_value(dashboard).expect("serialize");
    assert_eq!(value["lastAlert"]["message"], json!("flame"));
}

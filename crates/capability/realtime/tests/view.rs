use domain::{AlertEvent, TelemetryReading};
use iot_realtime::{
    AlertFilter, SeriesPoint, TelemetryStore, alert_device_options, dashboard_summary,
    merge_alerts, recent_telemetry, sensor_series,
};

fn alert(device_id: &str, ts: i64, severity: &str, message: &str) -> AlertEvent {
    AlertEvent::new(device_id)
        .with_ts(ts)
        .with_severity(severity)
        .with_message(message)
}

#[test]
fn recent_telemetry_merges_devices_by_ts() {
    let store = TelemetryStore::default();
    store.push_telemetry(TelemetryReading::new("dev-a", 30));
    store.push_telemetry(TelemetryReading::new("dev-b", 10));
    store.push_telemetry(TelemetryReading::new("dev-a", 40));
    store.push_telemetry(TelemetryReading::new("dev-b", 20));

    let recent = recent_telemetry(&store.snapshot(), 3);
    let order: Vec<i64> = recent.iter().map(|r| r.ts).collect();
    assert_eq!(order, vec![20, 30, 40]);
}

#[test]
fn sensor_series_keeps_gaps() {
    let readings = vec![
        TelemetryReading::new("dev-1", 1).with_sensor("temp", 21.5),
        TelemetryReading::new("dev-1", 2).with_sensor("gas", 300),
    ];
    let series = sensor_series(&readings, "temp");
    assert_eq!(
        series,
        vec![
            SeriesPoint { ts: 1, value: Some(21.5) },
            SeriesPoint { ts: 2, value: None },
        ]
    );
}

#[test]
fn dashboard_summary_reports_last_alert() {
    let store = TelemetryStore::default();
    store.push_telemetry(TelemetryReading::new("dev-1", 1));
    store.push_telemetry(TelemetryReading::new("dev-2", 2));
    store.push_alert(alert("dev-1", 10, "LOW", "gas"));
    store.push_alert(alert("dev-2", 20, "HIGH", "flame"));

    let summary = dashboard_summary(&store.snapshot(), 200);
    assert_eq!(summary.device_count, 2);
    assert_eq!(summary.total_alerts, 2);
    assert_eq!(
        summary.last_alert.and_then(|a| a.message).as_deref(),
        Some("flame")
    );
    assert_eq!(summary.recent.len(), 2);
}

#[test]
fn merge_alerts_dedups_and_sorts_desc() {
    let realtime = vec![alert("dev-1", 30, "HIGH", "flame"), alert("dev-1", 10, "LOW", "gas")];
    let historical = vec![
        alert("dev-1", 30, "MEDIUM", "flame"),
        alert("dev-2", 20, "LOW", "smoke"),
        AlertEvent::new("dev-3").with_message("no ts"),
    ];
    let merged = merge_alerts(&realtime, &historical);
    let keys: Vec<(Option<i64>, &str)> = merged
        .iter()
        .map(|a| (a.ts, a.device_id.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![(Some(30), "dev-1"), (Some(20), "dev-2"), (Some(10), "dev-1"), (None, "dev-3")]
    );
    assert_eq!(merged[0].severity.as_deref(), Some("HIGH"));
}

#[test]
fn alert_filter_combines_conditions() {
    let alerts = vec![
        alert("dev-1", 3, "HIGH", "Flame detected"),
        alert("dev-2", 2, "HIGH", "gas leak"),
        alert("dev-1", 1, "LOW", "flame flicker"),
        AlertEvent::new("dev-1").with_severity("HIGH"),
    ];

    let filter = AlertFilter {
        severity: Some("HIGH".to_string()),
        device_id: None,
        search: Some("FLAME".to_string()),
    };
    let matched = filter.apply(&alerts);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].ts, Some(3));

    let by_device = AlertFilter {
        device_id: Some("dev-1".to_string()),
        ..AlertFilter::default()
    };
    assert_eq!(by_device.apply(&alerts).len(), 3);
    assert_eq!(AlertFilter::default().apply(&alerts).len(), 4);
}

#[test]
fn device_options_are_distinct_in_first_seen_order() {
    let alerts = vec![
        alert("dev-2", 3, "HIGH", "a"),
        alert("dev-1", 2, "HIGH", "b"),
        alert("dev-2", 1, "HIGH", "c"),
    ];
    assert_eq!(alert_device_options(&alerts), vec!["dev-2", "dev-1"]);
}

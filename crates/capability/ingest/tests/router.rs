use domain::{AlertEvent, TelemetryReading};
use iot_ingest::{MessageKind, MessageRouter, RouteOutcome, TopicRoutes};
use iot_realtime::TelemetryStore;
use serde_json::json;
use std::sync::Arc;

fn router() -> (MessageRouter, Arc<TelemetryStore>) {
    let store = Arc::new(TelemetryStore::default());
    (MessageRouter::new(store.clone(), TopicRoutes::default()), store)
}

#[test]
fn telemetry_message_lands_in_device_ring() {
    let (router, store) = router();
    let payload = r#"{"deviceId":"dev-1","ts":1000,"sensors":{"temp":21.5}}"#;
    let outcome = router.route("home/dev-1/telemetry", payload.as_bytes());
    assert_eq!(outcome, RouteOutcome::Accepted(MessageKind::Telemetry));

    let list = store.device("dev-1").expect("device");
    assert_eq!(list.len(), 1);
    let expected: TelemetryReading = serde_json::from_str(payload).expect("parse");
    assert_eq!(list[0], expected);
    assert_eq!(
        serde_json::to_value(&list[0]).expect("serialize"),
        json!({"deviceId":"dev-1","ts":1000,"sensors":{"temp":21.5}})
    );
}

#[test]
fn alert_message_is_prepended() {
    let (router, store) = router();
    router.route(
        "home/dev-1/alerts",
        br#"{"deviceId":"dev-1","ts":1000,"severity":"LOW","message":"gas"}"#,
    );
    let payload = r#"{"deviceId":"dev-1","ts":2000,"severity":"HIGH","message":"flame"}"#;
    let outcome = router.route("home/dev-1/alerts", payload.as_bytes());
    assert_eq!(outcome, RouteOutcome::Accepted(MessageKind::Alert));

    let alerts = store.alerts();
    let expected: AlertEvent = serde_json::from_str(payload).expect("parse");
    assert_eq!(alerts[0], expected);
    assert_eq!(alerts.len(), 2);
}

#[test]
fn ring_evicts_first_of_201_messages() {
    let (router, store) = router();
    for i in 0..201 {
        let payload = format!(r#"{{"deviceId":"dev-2","ts":{},"sensors":{{"gas":{}}}}}"#, 1000 + i, i);
        router.route("home/dev-2/telemetry", payload.as_bytes());
    }
    let list = store.device("dev-2").expect("device");
    assert_eq!(list.len(), 200);
    assert_eq!(list[0].ts, 1001);
}

#[test]
fn invalid_json_is_dropped() {
    let (router, store) = router();
    let outcome = router.route("home/dev-1/telemetry", b"not-json");
    assert_eq!(outcome, RouteOutcome::Malformed);
    assert!(store.snapshot().is_empty());

    let outcome = router.route("home/dev-1/telemetry", &[0xff, 0xfe, 0x00]);
    assert_eq!(outcome, RouteOutcome::Malformed);
    assert!(store.snapshot().is_empty());
}

#[test]
fn wrong_shape_is_dropped() {
    let (router, store) = router();
    assert_eq!(router.route("home/dev-1/telemetry", b"42"), RouteOutcome::Malformed);
    assert_eq!(
        router.route("home/dev-1/telemetry", br#"{"deviceId":"dev-1","ts":"soon"}"#),
        RouteOutcome::Malformed
    );
    assert!(store.snapshot().is_empty());
}

#[test]
fn missing_device_id_is_rejected_by_store() {
    let (router, store) = router();
    assert_eq!(
        router.route("home/x/telemetry", b"{}"),
        RouteOutcome::Rejected(MessageKind::Telemetry)
    );
    assert_eq!(
        router.route("home/x/alerts", br#"{"ts":1}"#),
        RouteOutcome::Rejected(MessageKind::Alert)
    );
    assert!(store.snapshot().is_empty());
}

#[test]
fn other_suffixes_are_ignored() {
    let (router, store) = router();
    let outcome = router.route("home/dev-1/status", br#"{"deviceId":"dev-1","online":true}"#);
    assert_eq!(outcome, RouteOutcome::Unrouted);
    assert!(store.snapshot().is_empty());
}

#[test]
fn custom_route_table() {
    let store = Arc::new(TelemetryStore::default());
    let routes = TopicRoutes::empty().with_route("/sensors", MessageKind::Telemetry);
    let router = MessageRouter::new(store.clone(), routes);
    assert_eq!(
        router.route("plant/dev-9/sensors", br#"{"deviceId":"dev-9","ts":5}"#),
        RouteOutcome::Accepted(MessageKind::Telemetry)
    );
    assert_eq!(
        router.route("plant/dev-9/telemetry", br#"{"deviceId":"dev-9","ts":6}"#),
        RouteOutcome::Unrouted
    );
    assert_eq!(store.device("dev-9").map(|l| l.len()), Some(1));
}

#[test]
fn numeric_device_id_is_routed() {
    let (router, store) = router();
    assert_eq!(
        router.route("home/42/telemetry", br#"{"deviceId":42,"ts":1000}"#),
        RouteOutcome::Accepted(MessageKind::Telemetry)
    );
    assert_eq!(store.device("42").map(|list| list.len()), Some(1));
}

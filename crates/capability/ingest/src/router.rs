//! 报文路由
//!
//! 负载先按文本解码再解析为 JSON；随后按 topic 后缀分类，
//! 转换为 `TelemetryReading` / `AlertEvent` 写入 store。
//! 任何失败都只丢弃当前报文。

use domain::{AlertEvent, TelemetryReading};
use iot_realtime::TelemetryStore;
use iot_telemetry::{
    record_alert_accepted, record_message_received, record_parse_failure, record_store_rejected,
    record_telemetry_accepted, record_unrouted_message,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// 报文类别。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Telemetry,
    Alert,
}

impl MessageKind {
    pub fn default_suffix(self) -> &'static str {
        match self {
            Self::Telemetry => "/telemetry",
            Self::Alert => "/alerts",
        }
    }
}

/// topic 后缀到报文类别的映射表，按顺序匹配，先命中者生效。
#[derive(Debug, Clone)]
pub struct TopicRoutes {
    routes: Vec<(String, MessageKind)>,
}

impl Default for TopicRoutes {
    fn default() -> Self {
        Self::empty()
            .with_route(MessageKind::Telemetry.default_suffix(), MessageKind::Telemetry)
            .with_route(MessageKind::Alert.default_suffix(), MessageKind::Alert)
    }
}

impl TopicRoutes {
    pub fn empty() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn with_route(mut self, suffix: impl Into<String>, kind: MessageKind) -> Self {
        self.routes.push((suffix.into(), kind));
        self
    }

    pub fn classify(&self, topic: &str) -> Option<MessageKind> {
        self.routes
            .iter()
            .find(|(suffix, _)| topic.ends_with(suffix.as_str()))
            .map(|(_, kind)| *kind)
    }
}

/// 单条报文的处理结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Accepted(MessageKind),
    /// store 拒绝（缺少 deviceId）。
    Rejected(MessageKind),
    /// topic 不属于任何已知类别。
    Unrouted,
    /// 非 JSON 或结构不符。
    Malformed,
}

/// 报文分发器：持有 store 的共享引用，不保留任何报文。
#[derive(Clone)]
pub struct MessageRouter {
    routes: TopicRoutes,
    store: Arc<TelemetryStore>,
}

impl MessageRouter {
    pub fn new(store: Arc<TelemetryStore>, routes: TopicRoutes) -> Self {
        Self { routes, store }
    }

    pub fn routes(&self) -> &TopicRoutes {
        &self.routes
    }

    pub fn store(&self) -> &Arc<TelemetryStore> {
        &self.store
    }

    pub fn route(&self, topic: &str, payload: &[u8]) -> RouteOutcome {
        record_message_received();
        let text = String::from_utf8_lossy(payload);
        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(err) => {
                record_parse_failure();
                warn!(
                    target: "iot.ingest",
                    topic = %topic,
                    payload = %text,
                    error = %err,
                    "mqtt_json_parse_failed"
                );
                return RouteOutcome::Malformed;
            }
        };

        let Some(kind) = self.routes.classify(topic) else {
            record_unrouted_message();
            debug!(target: "iot.ingest", topic = %topic, "mqtt_topic_unrouted");
            return RouteOutcome::Unrouted;
        };

        let admitted = match kind {
            MessageKind::Telemetry => match serde_json::from_value::<TelemetryReading>(value) {
                Ok(reading) => self.store.push_telemetry(reading),
                Err(err) => return malformed(topic, kind, &text, err),
            },
            MessageKind::Alert => match serde_json::from_value::<AlertEvent>(value) {
                Ok(alert) => self.store.push_alert(alert),
                Err(err) => return malformed(topic, kind, &text, err),
            },
        };

        if !admitted {
            record_store_rejected();
            return RouteOutcome::Rejected(kind);
        }
        match kind {
            MessageKind::Telemetry => record_telemetry_accepted(),
            MessageKind::Alert => record_alert_accepted(),
        }
        RouteOutcome::Accepted(kind)
    }
}

fn malformed(topic: &str, kind: MessageKind, text: &str, err: serde_json::Error) -> RouteOutcome {
    record_parse_failure();
    warn!(
        target: "iot.ingest",
        topic = %topic,
        kind = ?kind,
        payload = %text,
        error = %err,
        "mqtt_payload_shape_invalid"
    );
    RouteOutcome::Malformed
}

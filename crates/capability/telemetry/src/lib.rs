//! 追踪、请求 ID 与实时接入计数。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 接入指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub messages_received: u64,
    pub telemetry_accepted: u64,
    pub alerts_accepted: u64,
    pub store_rejected: u64,
    pub parse_failures: u64,
    pub unrouted_messages: u64,
    pub connect_attempts: u64,
    pub connect_failures: u64,
    pub connections_established: u64,
    pub subscribe_failures: u64,
    pub transport_errors: u64,
    pub reconnects_scheduled: u64,
}

/// 接入指标（进程级）。
pub struct TelemetryMetrics {
    messages_received: AtomicU64,
    telemetry_accepted: AtomicU64,
    alerts_accepted: AtomicU64,
    store_rejected: AtomicU64,
    parse_failures: AtomicU64,
    unrouted_messages: AtomicU64,
    connect_attempts: AtomicU64,
    connect_failures: AtomicU64,
    connections_established: AtomicU64,
    subscribe_failures: AtomicU64,
    transport_errors: AtomicU64,
    reconnects_scheduled: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            messages_received: AtomicU64::new(0),
            telemetry_accepted: AtomicU64::new(0),
            alerts_accepted: AtomicU64::new(0),
            store_rejected: AtomicU64::new(0),
            parse_failures: AtomicU64::new(0),
            unrouted_messages: AtomicU64::new(0),
            connect_attempts: AtomicU64::new(0),
            connect_failures: AtomicU64::new(0),
            connections_established: AtomicU64::new(0),
            subscribe_failures: AtomicU64::new(0),
            transport_errors: AtomicU64::new(0),
            reconnects_scheduled: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_received: self.messages_received.load(Ordering::Relaxed),
            telemetry_accepted: self.telemetry_accepted.load(Ordering::Relaxed),
            alerts_accepted: self.alerts_accepted.load(Ordering::Relaxed),
            store_rejected: self.store_rejected.load(Ordering::Relaxed),
            parse_failures: self.parse_failures.load(Ordering::Relaxed),
            unrouted_messages: self.unrouted_messages.load(Ordering::Relaxed),
            connect_attempts: self.connect_attempts.load(Ordering::Relaxed),
            connect_failures: self.connect_failures.load(Ordering::Relaxed),
            connections_established: self.connections_established.load(Ordering::Relaxed),
            subscribe_failures: self.subscribe_failures.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
            reconnects_scheduled: self.reconnects_scheduled.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录收到的 MQTT 报文次数。
pub fn record_message_received() {
    metrics().messages_received.fetch_add(1, Ordering::Relaxed);
}

/// 记录写入 store 的遥测条数。
pub fn record_telemetry_accepted() {
    metrics().telemetry_accepted.fetch_add(1, Ordering::Relaxed);
}

/// 记录写入 store 的告警条数。
pub fn record_alert_accepted() {
    metrics().alerts_accepted.fetch_add(1, Ordering::Relaxed);
}

/// 记录被 store 拒绝（缺少 deviceId）的次数。
pub fn record_store_rejected() {
    metrics().store_rejected.fetch_add(1, Ordering::Relaxed);
}

/// 记录报文解析失败次数。
pub fn record_parse_failure() {
    metrics().parse_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录 topic 未命中路由的次数。
pub fn record_unrouted_message() {
    metrics().unrouted_messages.fetch_add(1, Ordering::Relaxed);
}

/// 记录发起连接次数。
pub fn record_connect_attempt() {
    metrics().connect_attempts.fetch_add(1, Ordering::Relaxed);
}

/// 记录连接失败次数。
pub fn record_connect_failure() {
    metrics().connect_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录连接建立成功次数。
pub fn record_connection_established() {
    metrics()
        .connections_established
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录订阅失败次数。
pub fn record_subscribe_failure() {
    metrics().subscribe_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录传输层错误次数。
pub fn record_transport_error() {
    metrics().transport_errors.fetch_add(1, Ordering::Relaxed);
}

/// 记录已排定的重连次数。
pub fn record_reconnect_scheduled() {
    metrics()
        .reconnects_scheduled
        .fetch_add(1, Ordering::Relaxed);
}

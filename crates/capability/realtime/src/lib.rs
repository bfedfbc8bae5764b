//! 有界实时状态存储
//!
//! 持有看板渲染所需的最近状态：
//! - 按设备分组的遥测环形缓冲（超出容量时丢弃最旧读数）
//! - 全局告警列表（最新在前，超出容量时丢弃尾部）
//!
//! 每次写入都提交一份新的不可变快照，已持有旧快照的读者不受影响。

pub mod store;
pub mod view;

pub use store::{
    DEFAULT_ALERT_CAPACITY, DEFAULT_TELEMETRY_CAPACITY, DeviceReadings, StoreLimits,
    StoreSnapshot, TelemetryStore,
};
pub use view::{
    AlertFilter, DEFAULT_RECENT_LIMIT, DashboardSummary, SeriesPoint, alert_device_options,
    dashboard_summary, merge_alerts, recent_telemetry, sensor_series,
};

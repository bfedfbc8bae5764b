//! 看板视图
//!
//! 基于快照的只读派生查询：跨设备合并遥测、传感器曲线、告警合并去重与过滤。
//! store 本身不排序，排序都在这里完成。

use crate::store::StoreSnapshot;
use domain::{AlertEvent, TelemetryReading};
use std::collections::HashSet;

/// 看板默认展示的遥测条数。
pub const DEFAULT_RECENT_LIMIT: usize = 200;

/// 合并所有设备的遥测，按 ts 升序，保留最近 `limit` 条。
pub fn recent_telemetry(snapshot: &StoreSnapshot, limit: usize) -> Vec<TelemetryReading> {
    let mut readings: Vec<TelemetryReading> = snapshot
        .by_device()
        .values()
        .flat_map(|list| list.iter().cloned())
        .collect();
    readings.sort_by_key(|reading| reading.ts);
    let skip = readings.len().saturating_sub(limit);
    readings.split_off(skip)
}

/// 单个传感器的曲线点。
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub ts: i64,
    pub value: Option<f64>,
}

/// 抽取某个传感器字段的时间序列；字段缺失的读数保留为空值。
pub fn sensor_series(readings: &[TelemetryReading], key: &str) -> Vec<SeriesPoint> {
    readings
        .iter()
        .map(|reading| SeriesPoint {
            ts: reading.ts,
            value: reading.sensor(key),
        })
        .collect()
}

/// 看板汇总。
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub device_count: usize,
    pub total_alerts: usize,
    pub last_alert: Option<AlertEvent>,
    pub recent: Vec<TelemetryReading>,
}

pub fn dashboard_summary(snapshot: &StoreSnapshot, limit: usize) -> DashboardSummary {
    DashboardSummary {
        device_count: snapshot.device_count(),
        total_alerts: snapshot.alerts().len(),
        last_alert: snapshot.alerts().first().cloned(),
        recent: recent_telemetry(snapshot, limit),
    }
}

/// 合并实时告警与历史告警。
///
/// 按 (ts, deviceId, message) 去重，先出现者保留（实时优先），
/// 结果按 ts 降序，缺失 ts 视为 0。
pub fn merge_alerts(realtime: &[AlertEvent], historical: &[AlertEvent]) -> Vec<AlertEvent> {
    let mut seen = HashSet::new();
    let mut merged: Vec<AlertEvent> = realtime
        .iter()
        .chain(historical)
        .filter(|alert| seen.insert(alert.key()))
        .cloned()
        .collect();
    merged.sort_by_key(|alert| std::cmp::Reverse(alert.ts.unwrap_or(0)));
    merged
}

/// 告警过滤条件；未设置的条件不参与过滤。
#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    pub severity: Option<String>,
    pub device_id: Option<String>,
    /// 对 message 做大小写不敏感的子串匹配。
    pub search: Option<String>,
}

impl AlertFilter {
    pub fn matches(&self, alert: &AlertEvent) -> bool {
        if let Some(severity) = self.severity.as_deref() {
            if alert.severity.as_deref() != Some(severity) {
                return false;
            }
        }
        if let Some(device_id) = self.device_id.as_deref() {
            if alert.device_id != device_id {
                return false;
            }
        }
        if let Some(search) = self.search.as_deref() {
            let needle = search.to_lowercase();
            let found = alert
                .message
                .as_deref()
                .is_some_and(|message| message.to_lowercase().contains(&needle));
            if !found {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, alerts: &[AlertEvent]) -> Vec<AlertEvent> {
        alerts
            .iter()
            .filter(|alert| self.matches(alert))
            .cloned()
            .collect()
    }
}

/// 告警中出现过的设备，按首次出现顺序。
pub fn alert_device_options(alerts: &[AlertEvent]) -> Vec<String> {
    let mut seen = HashSet::new();
    alerts
        .iter()
        .filter(|alert| alert.has_device_id())
        .filter(|alert| seen.insert(alert.device_id.as_str()))
        .map(|alert| alert.device_id.clone())
        .collect()
}

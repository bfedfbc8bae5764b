//! 稳定的 DTO 与 API 响应契约。

use domain::{AlertEvent, TelemetryReading};
use serde::{Deserialize, Serialize};

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 实时连接状态。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatusDto {
    /// 是否配置了 broker 地址与订阅 topic。
    pub enabled: bool,
    pub connected: bool,
    pub state: String,
    /// 处于重连等待时的等待时长。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backoff_ms: Option<u64>,
}

/// 设备概览。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSummaryDto {
    pub device_id: String,
    pub count: usize,
    pub latest: Option<TelemetryReading>,
}

/// 单设备读数（按到达顺序）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTelemetryDto {
    pub device_id: String,
    pub readings: Vec<TelemetryReading>,
}

/// 传感器曲线查询参数。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesQuery {
    pub sensor: Option<String>,
}

/// 曲线上的一个点，读数缺失该传感器时 value 为 null。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPointDto {
    pub ts: i64,
    pub value: Option<f64>,
}

/// 单传感器曲线。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorSeriesDto {
    pub device_id: String,
    pub sensor: String,
    pub points: Vec<SeriesPointDto>,
}

/// 告警查询参数。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertQuery {
    pub severity: Option<String>,
    #[serde(alias = "device_id")]
    pub device_id: Option<String>,
    pub search: Option<String>,
    pub limit: Option<usize>,
}

/// 告警列表。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertListDto {
    /// 过滤后、截断前的条数。
    pub total: usize,
    pub items: Vec<AlertEvent>,
    /// 全部告警中出现过的设备（首次出现顺序），用于筛选下拉框。
    pub device_options: Vec<String>,
}

/// 看板聚合。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub device_count: usize,
    pub total_alerts: usize,
    pub last_alert: Option<AlertEvent>,
    /// 全部设备读数按 ts 升序后的最近若干条。
    pub recent: Vec<TelemetryReading>,
}

/// 清空本地状态的结果。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearResultDto {
    pub cleared_devices: usize,
    pub cleared_alerts: usize,
}

/// 接入计数快照。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
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

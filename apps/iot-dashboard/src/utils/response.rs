//! HTTP 响应辅助函数和 DTO 转换
//!
//! - 错误响应：bad_request_error, not_found_error
//! - DTO 转换：把 realtime 视图结构转换为 api-contract 中的返回结构

use api_contract::{
    ApiResponse, DashboardDto, DeviceSummaryDto, MetricsSnapshotDto, SeriesPointDto,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::TelemetryReading;
use iot_realtime::{DashboardSummary, SeriesPoint};
use iot_telemetry::MetricsSnapshot;

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 资源未找到错误响应
pub fn not_found_error() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("RESOURCE.NOT_FOUND", "not found")),
    )
        .into_response()
}

pub fn device_summary_to_dto(device_id: &str, readings: &[TelemetryReading]) -> DeviceSummaryDto {
    DeviceSummaryDto {
        device_id: device_id.to_string(),
        count: readings.len(),
        latest: readings.last().cloned(),
    }
}

pub fn series_point_to_dto(point: SeriesPoint) -> SeriesPointDto {
    SeriesPointDto {
        ts: point.ts,
        value: point.value,
    }
}

pub fn dashboard_to_dto(summary: DashboardSummary) -> DashboardDto {
    DashboardDto {
        device_count: summary.device_count,
        total_alerts: summary.total_alerts,
        last_alert: summary.last_alert,
        recent: summary.recent,
    }
}

pub fn metrics_to_dto(snapshot: MetricsSnapshot) -> MetricsSnapshotDto {
    MetricsSnapshotDto {
        messages_received: snapshot.messages_received,
        telemetry_accepted: snapshot.telemetry_accepted,
        alerts_accepted: snapshot.alerts_accepted,
        store_rejected: snapshot.store_rejected,
        parse_failures: snapshot.parse_failures,
        unrouted_messages: snapshot.unrouted_messages,
        connect_attempts: snapshot.connect_attempts,
        connect_failures: snapshot.connect_failures,
        connections_established: snapshot.connections_established,
        subscribe_failures: snapshot.subscribe_failures,
        transport_errors: snapshot.transport_errors,
        reconnects_scheduled: snapshot.reconnects_scheduled,
    }
}

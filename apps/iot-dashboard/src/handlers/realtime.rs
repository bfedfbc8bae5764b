//! 实时状态 handlers
//!
//! - GET /realtime/status
//! - GET /realtime/devices
//! - GET /realtime/devices/{device_id}
//! - GET /realtime/devices/{device_id}/series?sensor=
//! - POST /realtime/clear

use crate::AppState;
use crate::utils::normalize_required;
use crate::utils::response::{
    bad_request_error, device_summary_to_dto, not_found_error, series_point_to_dto,
};
use api_contract::{
    ApiResponse, ClearResultDto, ConnectionStatusDto, DeviceSummaryDto, DeviceTelemetryDto,
    SensorSeriesDto, SeriesQuery,
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use iot_ingest::ConnectionState;
use iot_realtime::sensor_series;
use tracing::info;

pub async fn get_status(State(state): State<AppState>) -> Response {
    let (enabled, current) = match state.connection.as_ref() {
        Some(manager) => (true, manager.state()),
        None => (false, ConnectionState::Idle),
    };
    let backoff_ms = match current {
        ConnectionState::ReconnectWaiting { wait } => Some(wait.as_millis() as u64),
        _ => None,
    };
    let data = ConnectionStatusDto {
        enabled,
        connected: current.is_connected(),
        state: current.name().to_string(),
        backoff_ms,
    };
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

pub async fn list_devices(State(state): State<AppState>) -> Response {
    let by_device = state.store.by_device();
    let data: Vec<DeviceSummaryDto> = by_device
        .iter()
        .map(|(device_id, readings)| device_summary_to_dto(device_id, readings))
        .collect();
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

pub async fn get_device(State(state): State<AppState>, Path(device_id): Path<String>) -> Response {
    let Some(readings) = state.store.device(&device_id) else {
        return not_found_error();
    };
    let data = DeviceTelemetryDto {
        device_id,
        readings: readings.as_ref().clone(),
    };
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

pub async fn get_device_series(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    query: Result<Query<SeriesQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(err) => return bad_request_error(err.body_text()),
    };
    let sensor = match normalize_required(query.sensor, "sensor") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let Some(readings) = state.store.device(&device_id) else {
        return not_found_error();
    };
    let data = SensorSeriesDto {
        points: sensor_series(&readings, &sensor)
            .into_iter()
            .map(series_point_to_dto)
            .collect(),
        device_id,
        sensor,
    };
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

/// 清空本地遥测与告警；连接保持不变。
pub async fn clear_realtime(State(state): State<AppState>) -> Response {
    let before = state.store.snapshot();
    state.store.clear();
    let data = ClearResultDto {
        cleared_devices: before.device_count(),
        cleared_alerts: before.alerts().len(),
    };
    info!(
        target: "iot.api",
        devices = data.cleared_devices,
        alerts = data.cleared_alerts,
        "realtime_store_cleared"
    );
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

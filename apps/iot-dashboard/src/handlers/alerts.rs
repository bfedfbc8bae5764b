//! 告警查询 handlers
//!
//! - GET /realtime/alerts?severity=&deviceId=&search=&limit=

use crate::AppState;
use crate::utils::response::bad_request_error;
use crate::utils::{normalize_filter, normalize_limit};
use api_contract::{AlertListDto, AlertQuery, ApiResponse};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use iot_realtime::{AlertFilter, alert_device_options, merge_alerts};

pub async fn list_alerts(
    State(state): State<AppState>,
    query: Result<Query<AlertQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(err) => return bad_request_error(err.body_text()),
    };
    let limit = match normalize_limit(query.limit) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let filter = AlertFilter {
        severity: normalize_filter(query.severity),
        device_id: normalize_filter(query.device_id),
        search: normalize_filter(query.search),
    };

    // 同一告警可能被重复投递：按 (ts, deviceId, message) 去重并按 ts 降序
    let alerts = merge_alerts(&state.store.alerts(), &[]);
    let mut items = filter.apply(&alerts);
    let total = items.len();
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    let data = AlertListDto {
        total,
        items,
        device_options: alert_device_options(&alerts),
    };
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

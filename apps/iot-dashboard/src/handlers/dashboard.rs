//! 看板汇总 handlers
//!
//! - GET /realtime/dashboard

use crate::AppState;
use crate::utils::response::dashboard_to_dto;
use api_contract::ApiResponse;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use iot_realtime::{DEFAULT_RECENT_LIMIT, dashboard_summary};

pub async fn get_dashboard(State(state): State<AppState>) -> Response {
    let summary = dashboard_summary(&state.store.snapshot(), DEFAULT_RECENT_LIMIT);
    (
        StatusCode::OK,
        Json(ApiResponse::success(dashboard_to_dto(summary))),
    )
        .into_response()
}

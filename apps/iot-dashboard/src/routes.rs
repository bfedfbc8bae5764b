//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers。
//! 路由包括：
//! - 健康检查：/health
//! - 连接状态：/realtime/status
//! - 设备遥测：/realtime/devices/*
//! - 告警：/realtime/alerts
//! - 看板汇总：/realtime/dashboard
//! - 清空本地状态：/realtime/clear
//! - 接入计数：/metrics

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{get, post},
};

/// 创建 API 路由
///
/// 返回包含所有 API 端点的 Router，由调用方同时挂载到 / 和 /api/ 前缀
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/realtime/status", get(get_status))
        .route("/realtime/devices", get(list_devices))
        .route("/realtime/devices/:device_id", get(get_device))
        .route("/realtime/devices/:device_id/series", get(get_device_series))
        .route("/realtime/alerts", get(list_alerts))
        .route("/realtime/dashboard", get(get_dashboard))
        .route("/realtime/clear", post(clear_realtime))
        .route("/metrics", get(get_metrics))
}

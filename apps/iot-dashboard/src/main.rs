//! 实时看板 HTTP 服务：装配 store 与 MQTT 连接，提供只读查询接口。

mod handlers;
mod middleware;
mod realtime;
mod routes;
mod utils;

use axum::Router;
use iot_config::AppConfig;
use iot_ingest::ConnectionManager;
use iot_realtime::TelemetryStore;
use iot_telemetry::init_tracing;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TelemetryStore>,
    /// 未配置 broker 时为 None。
    pub connection: Option<Arc<ConnectionManager>>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let store = realtime::build_store(&config);
    // 连接随进程存活，清空本地状态不会断开
    let connection = realtime::start_realtime(&config, store.clone())?;
    let state = AppState { store, connection };

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(target: "iot.api", addr = %config.http_addr, "http_listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// 组装路由：同时挂载在 / 与 /api 下。
pub fn build_app(state: AppState) -> Router {
    let api = routes::create_api_router();
    Router::new()
        .merge(api.clone())
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 注入 request_id/trace_id
        .layer(axum::middleware::from_fn(middleware::request_context))
}

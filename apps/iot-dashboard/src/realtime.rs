//! 实时链路装配模块
//!
//! 按配置创建有界 store，并在配置了 broker 地址与订阅 topic 时启动连接管理器。
//! 管理器自行负责重连，这里只额外挂一个状态日志任务。

use iot_config::AppConfig;
use iot_ingest::{
    ConnectOptions, ConnectionManager, IngestError, ManagerConfig, MessageRouter, MqttTransport,
    MqttTransportConfig, TopicRoutes,
};
use iot_realtime::{StoreLimits, TelemetryStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 按配置容量创建 store。
pub fn build_store(config: &AppConfig) -> Arc<TelemetryStore> {
    let limits = StoreLimits::new(config.telemetry_capacity, config.alert_capacity);
    Arc::new(TelemetryStore::new(limits))
}

/// 启动实时接入；未配置 broker 地址或 topic 时返回 None，不视为错误。
pub fn start_realtime(
    config: &AppConfig,
    store: Arc<TelemetryStore>,
) -> Result<Option<Arc<ConnectionManager>>, IngestError> {
    let Some(url) = config.mqtt_url.as_deref().filter(|_| config.realtime_enabled()) else {
        info!(target: "iot.realtime", "realtime disabled: IOT_MQTT_URL or IOT_MQTT_TOPICS not set");
        return Ok(None);
    };

    let transport = MqttTransport::new(MqttTransportConfig {
        client_id_prefix: config.mqtt_client_id_prefix.clone(),
        username: config.mqtt_username.clone(),
        password: config.mqtt_password.clone(),
        ..MqttTransportConfig::default()
    });
    let router = MessageRouter::new(store, TopicRoutes::default());
    let manager = Arc::new(ConnectionManager::new(
        Arc::new(transport),
        router,
        manager_config(config),
    ));
    manager.connect(url, config.mqtt_topics.clone())?;
    info!(
        target: "iot.realtime",
        topics = ?config.mqtt_topics,
        "realtime source: mqtt"
    );

    spawn_state_logger(&manager);
    Ok(Some(manager))
}

fn manager_config(config: &AppConfig) -> ManagerConfig {
    ManagerConfig {
        connect: ConnectOptions {
            clean_session: config.mqtt_clean_session,
            keep_alive: Duration::from_secs(config.mqtt_keepalive_seconds),
        },
        backoff_base: Duration::from_millis(config.mqtt_reconnect_base_ms),
        backoff_max: Duration::from_millis(config.mqtt_reconnect_max_ms),
    }
}

/// 连接状态变化时输出一条日志；管理器 drop 后任务自然结束。
fn spawn_state_logger(manager: &ConnectionManager) {
    let mut state = manager.subscribe_state();
    tokio::spawn(async move {
        while state.changed().await.is_ok() {
            let current = state.borrow_and_update().clone();
            info!(
                target: "iot.realtime",
                state = current.name(),
                connected = current.is_connected(),
                "connection_state_changed"
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            http_addr: "127.0.0.1:0".to_string(),
            mqtt_url: None,
            mqtt_topics: Vec::new(),
            mqtt_username: None,
            mqtt_password: None,
            mqtt_client_id_prefix: "iot-dashboard".to_string(),
            mqtt_keepalive_seconds: 30,
            mqtt_clean_session: false,
            mqtt_reconnect_base_ms: 500,
            mqtt_reconnect_max_ms: 8000,
            telemetry_capacity: 3,
            alert_capacity: 2,
        }
    }

    #[tokio::test]
    async fn realtime_needs_url_and_topics() {
        let mut config = config();
        let store = build_store(&config);
        assert!(start_realtime(&config, store.clone()).expect("start").is_none());

        config.mqtt_url = Some("ws://broker.local:9001/mqtt".to_string());
        assert!(start_realtime(&config, store.clone()).expect("start").is_none());

        config.mqtt_url = None;
        config.mqtt_topics = vec!["home/#".to_string()];
        assert!(start_realtime(&config, store).expect("start").is_none());
    }

    #[tokio::test]
    async fn invalid_url_fails_startup() {
        let mut config = config();
        config.mqtt_url = Some("broker.local".to_string());
        config.mqtt_topics = vec!["home/#".to_string()];
        let store = build_store(&config);
        let Err(err) = start_realtime(&config, store) else {
            panic!("invalid url should fail startup");
        };
        assert!(matches!(err, IngestError::InvalidEndpoint(_)));
    }

    #[test]
    fn limits_and_backoff_follow_config() {
        let config = config();
        assert_eq!(build_store(&config).limits(), StoreLimits::new(3, 2));
        let manager = manager_config(&config);
        assert_eq!(manager.backoff_base, Duration::from_millis(500));
        assert_eq!(manager.backoff_max, Duration::from_millis(8000));
        assert_eq!(manager.connect.keep_alive, Duration::from_secs(30));
        assert!(!manager.connect.clean_session);
    }
}

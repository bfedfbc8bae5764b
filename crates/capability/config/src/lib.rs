//! 应用运行配置加载。

use domain::parse_topic_filters;
use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    /// 未配置时实时接入不启用。
    pub mqtt_url: Option<String>,
    pub mqtt_topics: Vec<String>,
    pub mqtt_username: Option<String>,
    pub mqtt_password: Option<String>,
    pub mqtt_client_id_prefix: String,
    pub mqtt_keepalive_seconds: u64,
    pub mqtt_clean_session: bool,
    pub mqtt_reconnect_base_ms: u64,
    pub mqtt_reconnect_max_ms: u64,
    pub telemetry_capacity: usize,
    pub alert_capacity: usize,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr = env::var("IOT_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let mqtt_url = read_optional("IOT_MQTT_URL").map(|value| value.trim().to_string());
        let mqtt_topics = read_optional("IOT_MQTT_TOPICS")
            .map(|value| parse_topic_filters(&value))
            .unwrap_or_default();
        let mqtt_username = read_optional("IOT_MQTT_USERNAME");
        let mqtt_password = read_optional("IOT_MQTT_PASSWORD");
        if mqtt_password.is_some() && mqtt_username.is_none() {
            return Err(ConfigError::Missing("IOT_MQTT_USERNAME".to_string()));
        }
        // client id 不允许以空白开头
        let mqtt_client_id_prefix = read_optional("IOT_MQTT_CLIENT_ID_PREFIX")
            .map(|value| value.trim().to_string())
            .unwrap_or_else(|| "iot-dashboard".to_string());
        let mqtt_keepalive_seconds = read_u64_with_default("IOT_MQTT_KEEPALIVE_SECONDS", 60)?;
        let mqtt_clean_session = read_bool_with_default("IOT_MQTT_CLEAN_SESSION", true);
        let mqtt_reconnect_base_ms = read_u64_with_default("IOT_MQTT_RECONNECT_BASE_MS", 1000)?;
        let mqtt_reconnect_max_ms = read_u64_with_default("IOT_MQTT_RECONNECT_MAX_MS", 15000)?;
        if mqtt_reconnect_base_ms == 0 {
            return Err(ConfigError::Invalid(
                "IOT_MQTT_RECONNECT_BASE_MS".to_string(),
                mqtt_reconnect_base_ms.to_string(),
            ));
        }
        if mqtt_reconnect_max_ms < mqtt_reconnect_base_ms {
            return Err(ConfigError::Invalid(
                "IOT_MQTT_RECONNECT_MAX_MS".to_string(),
                mqtt_reconnect_max_ms.to_string(),
            ));
        }
        let telemetry_capacity = read_capacity_with_default("IOT_TELEMETRY_CAPACITY", 200)?;
        let alert_capacity = read_capacity_with_default("IOT_ALERT_CAPACITY", 500)?;

        Ok(Self {
            http_addr,
            mqtt_url,
            mqtt_topics,
            mqtt_username,
            mqtt_password,
            mqtt_client_id_prefix,
            mqtt_keepalive_seconds,
            mqtt_clean_session,
            mqtt_reconnect_base_ms,
            mqtt_reconnect_max_ms,
            telemetry_capacity,
            alert_capacity,
        })
    }

    /// 实时接入是否启用：需要 broker 地址且至少一个 topic。
    pub fn realtime_enabled(&self) -> bool {
        self.mqtt_url.as_deref().is_some_and(|url| !url.is_empty()) && !self.mqtt_topics.is_empty()
    }
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_capacity_with_default(key: &str, default: usize) -> Result<usize, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    match value.trim().parse::<usize>() {
        Ok(capacity) if capacity > 0 => Ok(capacity),
        _ => Err(ConfigError::Invalid(key.to_string(), value)),
    }
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}

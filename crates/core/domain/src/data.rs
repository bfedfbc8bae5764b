use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// 传感器读数：字段名原样透传，不做 schema 约束。
pub type SensorMap = Map<String, Value>;

/// 设备上报的一条遥测读数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryReading {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub device_id: String,
    /// 毫秒时间戳。
    #[serde(default)]
    pub ts: i64,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub sensors: SensorMap,
    /// 上游附带的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TelemetryReading {
    pub fn new(device_id: impl Into<String>, ts: i64) -> Self {
        Self {
            device_id: device_id.into(),
            ts,
            sensors: SensorMap::new(),
            extra: Map::new(),
        }
    }

    pub fn with_sensor(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.sensors.insert(key.into(), value.into());
        self
    }

    /// 读取数值型传感器字段；非数值返回 None。
    pub fn sensor(&self, key: &str) -> Option<f64> {
        self.sensors.get(key).and_then(Value::as_f64)
    }

    pub fn has_device_id(&self) -> bool {
        !self.device_id.is_empty()
    }
}

/// 设备上报的一条告警。
///
/// 除 `deviceId` 外各字段均为上游自由格式，缺省即为 None。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEvent {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub device_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AlertEvent {
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            ts: None,
            kind: None,
            severity: None,
            message: None,
            extra: Map::new(),
        }
    }

    pub fn with_ts(mut self, ts: i64) -> Self {
        self.ts = Some(ts);
        self
    }

    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = Some(severity.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn has_device_id(&self) -> bool {
        !self.device_id.is_empty()
    }

    /// 去重键：时间戳 + 设备 + 消息。
    pub fn key(&self) -> AlertKey {
        AlertKey {
            ts: self.ts,
            device_id: self.device_id.clone(),
            message: self.message.clone(),
        }
    }
}

/// 告警去重键。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlertKey {
    pub ts: Option<i64>,
    pub device_id: String,
    pub message: Option<String>,
}

/// 上游 deviceId 可能是字符串或数字。
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDeviceId {
    Text(String),
    Number(serde_json::Number),
}

/// null / 缺失 / 数字 0 均视为空 deviceId；其他数字转为十进制字符串。
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawDeviceId>::deserialize(deserializer)? {
        Some(RawDeviceId::Text(text)) => text,
        Some(RawDeviceId::Number(number)) if number.as_f64() == Some(0.0) => String::new(),
        Some(RawDeviceId::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

//! 遥测与告警的快照存储

use domain::{AlertEvent, TelemetryReading};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, trace};

/// 每台设备保留的遥测条数上限。
pub const DEFAULT_TELEMETRY_CAPACITY: usize = 200;
/// 全局告警条数上限。
pub const DEFAULT_ALERT_CAPACITY: usize = 500;

/// 某台设备的遥测列表快照（按写入顺序）。
pub type DeviceReadings = Arc<Vec<TelemetryReading>>;

/// 容量参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLimits {
    pub telemetry_per_device: usize,
    pub alerts: usize,
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            telemetry_per_device: DEFAULT_TELEMETRY_CAPACITY,
            alerts: DEFAULT_ALERT_CAPACITY,
        }
    }
}

impl StoreLimits {
    pub fn new(telemetry_per_device: usize, alerts: usize) -> Self {
        Self {
            telemetry_per_device,
            alerts,
        }
    }

    fn sanitized(mut self) -> Self {
        if self.telemetry_per_device == 0 {
            self.telemetry_per_device = 1;
        }
        if self.alerts == 0 {
            self.alerts = 1;
        }
        self
    }
}

/// 一次提交后的完整只读视图。
///
/// clone 只复制 `Arc`，不复制数据。
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    by_device: Arc<BTreeMap<String, DeviceReadings>>,
    alerts: Arc<Vec<AlertEvent>>,
}

impl StoreSnapshot {
    pub fn by_device(&self) -> &BTreeMap<String, DeviceReadings> {
        &self.by_device
    }

    pub fn device(&self, device_id: &str) -> Option<&DeviceReadings> {
        self.by_device.get(device_id)
    }

    /// 最新在前。
    pub fn alerts(&self) -> &[AlertEvent] {
        &self.alerts
    }

    pub fn device_count(&self) -> usize {
        self.by_device.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_device.is_empty() && self.alerts.is_empty()
    }
}

/// 有界遥测存储：单写多读。
///
/// 写入通过 copy-on-write 生成新快照；订阅者经 `subscribe` 收到每次提交。
pub struct TelemetryStore {
    limits: StoreLimits,
    state: watch::Sender<StoreSnapshot>,
}

impl TelemetryStore {
    pub fn new(limits: StoreLimits) -> Self {
        let (state, _) = watch::channel(StoreSnapshot::default());
        Self {
            limits: limits.sanitized(),
            state,
        }
    }

    pub fn limits(&self) -> StoreLimits {
        self.limits
    }

    /// 追加一条遥测；缺少 deviceId 时静默拒绝并返回 false。
    pub fn push_telemetry(&self, reading: TelemetryReading) -> bool {
        if !reading.has_device_id() {
            debug!(target: "iot.realtime", ts = reading.ts, "telemetry_rejected_missing_device_id");
            return false;
        }
        let capacity = self.limits.telemetry_per_device;
        self.state.send_modify(|snapshot| {
            // 旧快照仍被读者持有时，make_mut 会先复制再修改。
            let by_device = Arc::make_mut(&mut snapshot.by_device);
            let list = by_device.entry(reading.device_id.clone()).or_default();
            let list = Arc::make_mut(list);
            list.push(reading);
            if list.len() > capacity {
                let excess = list.len() - capacity;
                list.drain(..excess);
                trace!(target: "iot.realtime", evicted = excess, "telemetry_evicted");
            }
        });
        true
    }

    /// 在列表头部插入一条告警；缺少 deviceId 时静默拒绝并返回 false。
    pub fn push_alert(&self, alert: AlertEvent) -> bool {
        if !alert.has_device_id() {
            debug!(target: "iot.realtime", ts = ?alert.ts, "alert_rejected_missing_device_id");
            return false;
        }
        let capacity = self.limits.alerts;
        self.state.send_modify(|snapshot| {
            let alerts = Arc::make_mut(&mut snapshot.alerts);
            alerts.insert(0, alert);
            alerts.truncate(capacity);
        });
        true
    }

    /// 清空全部本地状态；不影响连接管理器。
    pub fn clear(&self) {
        self.state.send_replace(StoreSnapshot::default());
        debug!(target: "iot.realtime", "store_cleared");
    }

    /// 最新提交的快照。
    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.borrow().clone()
    }

    pub fn by_device(&self) -> Arc<BTreeMap<String, DeviceReadings>> {
        self.state.borrow().by_device.clone()
    }

    pub fn device(&self, device_id: &str) -> Option<DeviceReadings> {
        self.state.borrow().by_device.get(device_id).cloned()
    }

    pub fn alerts(&self) -> Arc<Vec<AlertEvent>> {
        self.state.borrow().alerts.clone()
    }

    /// 订阅快照变更。
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.state.subscribe()
    }
}

impl Default for TelemetryStore {
    fn default() -> Self {
        Self::new(StoreLimits::default())
    }
}

//! 连接管理器
//!
//! 每个实例最多维持一条到 broker 的连接，由一个 supervisor 任务驱动：
//!
//! ```text
//! Idle ──connect()──▶ Connecting ──Connected──▶ Connected
//!                        ▲   │                     │
//!                        │   └──失败──┐   Closed / Error
//!                        │            ▼            ▼
//!                        └──定时到期── ReconnectWaiting
//! ```
//!
//! 状态只有一个权威来源（`watch` 中的 `ConnectionState`），
//! `connect()` 在同一把锁内完成检查与迁移，因此任何时刻至多一个传输句柄。
//! supervisor 会无限重试，直到管理器被 drop。

use crate::backoff::Backoff;
use crate::endpoint::BrokerEndpoint;
use crate::error::IngestError;
use crate::router::MessageRouter;
use crate::topics::TopicFilters;
use crate::transport::{ConnectOptions, Transport, TransportEvent, TransportSession};
use iot_telemetry::{
    record_connect_attempt, record_connect_failure, record_connection_established,
    record_reconnect_scheduled, record_subscribe_failure, record_transport_error,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// 连接状态。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Connected,
    /// 等待 `wait` 后发起下一次连接。
    ReconnectWaiting { wait: Duration },
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::ReconnectWaiting { .. } => "reconnect_waiting",
        }
    }
}

/// 管理器参数。
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    pub connect: ConnectOptions,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            connect: ConnectOptions::default(),
            backoff_base: Backoff::DEFAULT_BASE,
            backoff_max: Backoff::DEFAULT_MAX,
        }
    }
}

struct Shared {
    transport: Arc<dyn Transport>,
    router: MessageRouter,
    config: ManagerConfig,
    state: watch::Sender<ConnectionState>,
    /// 手动 connect 唤醒等待中的重连。
    wake: Notify,
}

/// 实时连接管理器。
pub struct ConnectionManager {
    shared: Arc<Shared>,
    supervisor: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectionManager {
    pub fn new(transport: Arc<dyn Transport>, router: MessageRouter, config: ManagerConfig) -> Self {
        let (state, _) = watch::channel(ConnectionState::Idle);
        Self {
            shared: Arc::new(Shared {
                transport,
                router,
                config,
                state,
                wake: Notify::new(),
            }),
            supervisor: Mutex::new(None),
        }
    }

    /// 发起连接。
    ///
    /// - `Idle`：进入 `Connecting` 并启动 supervisor 任务（需在 tokio 运行时内调用）
    /// - `ReconnectWaiting`：立即结束本轮等待，沿用首次传入的地址与 topic
    /// - `Connecting` / `Connected`：无操作
    ///
    /// 仅在地址非法时返回错误；运行期错误全部在内部处理。
    pub fn connect(
        &self,
        endpoint: &str,
        topics: impl Into<TopicFilters>,
    ) -> Result<(), IngestError> {
        let endpoint = BrokerEndpoint::parse(endpoint)?;
        let topics = topics.into();

        let mut start = false;
        let mut expedite = false;
        self.shared.state.send_if_modified(|state| match state {
            ConnectionState::Idle => {
                *state = ConnectionState::Connecting;
                start = true;
                true
            }
            ConnectionState::ReconnectWaiting { .. } => {
                expedite = true;
                false
            }
            ConnectionState::Connecting | ConnectionState::Connected => false,
        });

        if start {
            info!(
                target: "iot.ingest",
                endpoint = %endpoint,
                topics = ?topics.as_slice(),
                "mqtt_manager_started"
            );
            let handle = tokio::spawn(supervise(self.shared.clone(), endpoint, topics));
            if let Ok(mut slot) = self.supervisor.lock() {
                *slot = Some(handle);
            }
        } else if expedite {
            info!(target: "iot.ingest", "mqtt_reconnect_expedited");
            self.shared.wake.notify_waiters();
        }
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.shared.state.borrow().is_connected()
    }

    pub fn state(&self) -> ConnectionState {
        self.shared.state.borrow().clone()
    }

    /// 订阅状态变更。
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.shared.state.subscribe()
    }

    pub fn router(&self) -> &MessageRouter {
        &self.shared.router
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        if let Ok(slot) = self.supervisor.get_mut() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }
}

async fn supervise(shared: Arc<Shared>, endpoint: BrokerEndpoint, topics: TopicFilters) {
    let mut backoff = Backoff::new(shared.config.backoff_base, shared.config.backoff_max);
    loop {
        record_connect_attempt();
        info!(target: "iot.ingest", endpoint = %endpoint, "mqtt_connecting");
        match shared.transport.connect(&endpoint, &shared.config.connect).await {
            Ok(session) => shared.drive(session, &endpoint, &topics, &mut backoff).await,
            Err(err) => {
                record_connect_failure();
                warn!(target: "iot.ingest", endpoint = %endpoint, error = %err, "mqtt_connect_failed");
            }
        }

        let wait = backoff.next_wait();
        // 先登记等待者再发布状态，保证看到 ReconnectWaiting 的 connect() 一定能唤醒本轮。
        let woken = shared.wake.notified();
        tokio::pin!(woken);
        woken.as_mut().enable();
        shared
            .state
            .send_replace(ConnectionState::ReconnectWaiting { wait });
        record_reconnect_scheduled();
        info!(
            target: "iot.ingest",
            endpoint = %endpoint,
            wait_ms = wait.as_millis() as u64,
            "mqtt_reconnect_scheduled"
        );
        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = &mut woken => {}
        }
        shared.state.send_replace(ConnectionState::Connecting);
    }
}

impl Shared {
    /// 驱动一个会话直到关闭或出错。
    async fn drive(
        &self,
        mut session: Box<dyn TransportSession>,
        endpoint: &BrokerEndpoint,
        topics: &TopicFilters,
        backoff: &mut Backoff,
    ) {
        let mut established = false;
        loop {
            match session.next_event().await {
                TransportEvent::Connected => {
                    established = true;
                    backoff.reset();
                    self.state.send_replace(ConnectionState::Connected);
                    record_connection_established();
                    info!(target: "iot.ingest", endpoint = %endpoint, "mqtt_connected");
                    if topics.is_empty() {
                        continue;
                    }
                    match session.subscribe(topics.as_slice()).await {
                        Ok(()) => {
                            info!(target: "iot.ingest", topics = ?topics.as_slice(), "mqtt_subscribed")
                        }
                        Err(err) => {
                            record_subscribe_failure();
                            warn!(target: "iot.ingest", error = %err, "mqtt_subscribe_failed");
                        }
                    }
                }
                TransportEvent::Message { topic, payload } => {
                    self.router.route(&topic, &payload);
                }
                TransportEvent::SubscribeFailed(reason) => {
                    record_subscribe_failure();
                    warn!(target: "iot.ingest", reason = %reason, "mqtt_subscribe_rejected");
                }
                TransportEvent::Error(reason) => {
                    record_transport_error();
                    if !established {
                        record_connect_failure();
                    }
                    warn!(target: "iot.ingest", endpoint = %endpoint, error = %reason, "mqtt_transport_error");
                    break;
                }
                TransportEvent::Closed => {
                    info!(target: "iot.ingest", endpoint = %endpoint, "mqtt_closed");
                    break;
                }
            }
        }
        session.close();
    }
}

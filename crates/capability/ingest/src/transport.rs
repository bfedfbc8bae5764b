//! 传输层抽象
//!
//! 连接管理器只通过这里的 trait 与 broker 交互，便于替换底层客户端与在测试中脚本化。
//! 实现方不得自行重连：会话一旦报告 `Closed` 或 `Error` 即被丢弃，
//! 重试完全由连接管理器的退避策略负责。

use crate::endpoint::BrokerEndpoint;
use crate::error::IngestError;
use async_trait::async_trait;
use std::time::Duration;

/// 建连参数。
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub clean_session: bool,
    pub keep_alive: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            clean_session: true,
            keep_alive: Duration::from_secs(60),
        }
    }
}

/// 会话上报的事件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// broker 确认连接。
    Connected,
    Message { topic: String, payload: Vec<u8> },
    /// broker 拒绝了订阅（连接仍然有效）。
    SubscribeFailed(String),
    /// 致命错误，会话结束。
    Error(String),
    /// 连接关闭，会话结束。
    Closed,
}

/// 一次连接尝试产生的会话句柄。
#[async_trait]
pub trait TransportSession: Send {
    /// 批量订阅。
    async fn subscribe(&mut self, topics: &[String]) -> Result<(), IngestError>;

    /// 等待下一个事件；返回 `Error` 或 `Closed` 后不应再被调用。
    async fn next_event(&mut self) -> TransportEvent;

    /// 释放底层资源。
    fn close(&mut self);
}

/// 传输层工厂。
#[async_trait]
pub trait Transport: Send + Sync {
    async fn connect(
        &self,
        endpoint: &BrokerEndpoint,
        options: &ConnectOptions,
    ) -> Result<Box<dyn TransportSession>, IngestError>;
}

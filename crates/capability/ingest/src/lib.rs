//! 实时接入：MQTT 连接管理与报文路由
//!
//! - `manager`: 连接状态机（Idle / Connecting / Connected / ReconnectWaiting）与指数退避重连
//! - `router`: 按 topic 后缀把 JSON 报文分发到遥测或告警
//! - `transport`: 传输层抽象；`mqtt` 为基于 rumqttc 的实现

pub mod backoff;
pub mod endpoint;
pub mod error;
pub mod manager;
pub mod mqtt;
pub mod router;
pub mod topics;
pub mod transport;

pub use backoff::Backoff;
pub use endpoint::{BrokerEndpoint, BrokerScheme};
pub use error::IngestError;
pub use manager::{ConnectionManager, ConnectionState, ManagerConfig};
pub use mqtt::{MqttTransport, MqttTransportConfig};
pub use router::{MessageKind, MessageRouter, RouteOutcome, TopicRoutes};
pub use topics::TopicFilters;
pub use transport::{ConnectOptions, Transport, TransportEvent, TransportSession};

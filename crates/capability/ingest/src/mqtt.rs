//! 基于 rumqttc 的传输实现
//!
//! rumqttc 的 EventLoop 在 poll 出错后再次 poll 会自动重连；
//! 这里出错即结束会话并丢弃 EventLoop，不会再 poll。

use crate::endpoint::{BrokerEndpoint, BrokerScheme};
use crate::error::IngestError;
use crate::transport::{ConnectOptions, Transport, TransportEvent, TransportSession};
use async_trait::async_trait;
use rumqttc::{
    AsyncClient, ConnectReturnCode, Event, EventLoop, MqttOptions, Packet, QoS, SubscribeFilter,
    SubscribeReasonCode,
};
use tracing::debug;

/// MQTT 传输配置。
#[derive(Debug, Clone)]
pub struct MqttTransportConfig {
    pub client_id_prefix: String,
    /// 优先于 URL 中携带的凭据。
    pub username: Option<String>,
    pub password: Option<String>,
    /// AsyncClient 请求队列容量。
    pub request_capacity: usize,
}

impl Default for MqttTransportConfig {
    fn default() -> Self {
        Self {
            client_id_prefix: "iot-dashboard".to_string(),
            username: None,
            password: None,
            request_capacity: 10,
        }
    }
}

/// MQTT 传输。
#[derive(Debug, Clone, Default)]
pub struct MqttTransport {
    config: MqttTransportConfig,
}

impl MqttTransport {
    pub fn new(config: MqttTransportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MqttTransportConfig {
        &self.config
    }

    fn options_for(&self, endpoint: &BrokerEndpoint, options: &ConnectOptions) -> MqttOptions {
        let client_id = format!(
            "{}-{}",
            self.config.client_id_prefix.trim().trim_end_matches('-'),
            uuid::Uuid::new_v4()
        );
        // websocket 传输要求 broker_addr 为完整 URL。
        let mut mqtt = if endpoint.scheme().is_websocket() {
            MqttOptions::new(client_id, endpoint.url(), endpoint.port())
        } else {
            MqttOptions::new(client_id, endpoint.host(), endpoint.port())
        };
        mqtt.set_keep_alive(options.keep_alive);
        mqtt.set_clean_session(options.clean_session);
        match endpoint.scheme() {
            BrokerScheme::Tcp => {}
            BrokerScheme::Tls => {
                mqtt.set_transport(rumqttc::Transport::tls_with_default_config());
            }
            BrokerScheme::Ws => {
                mqtt.set_transport(rumqttc::Transport::Ws);
            }
            BrokerScheme::Wss => {
                mqtt.set_transport(rumqttc::Transport::wss_with_default_config());
            }
        }
        if let (Some(username), Some(password)) =
            (self.config.username.as_ref(), self.config.password.as_ref())
        {
            mqtt.set_credentials(username, password);
        } else if let Some((username, password)) = endpoint.credentials() {
            mqtt.set_credentials(username, password);
        }
        mqtt
    }
}

#[async_trait]
impl Transport for MqttTransport {
    async fn connect(
        &self,
        endpoint: &BrokerEndpoint,
        options: &ConnectOptions,
    ) -> Result<Box<dyn TransportSession>, IngestError> {
        let mqtt = self.options_for(endpoint, options);
        // 建连在首次 poll 时发生，结果以 Connected / Error 事件上报。
        let (client, eventloop) = AsyncClient::new(mqtt, self.config.request_capacity.max(1));
        Ok(Box::new(MqttSession { client, eventloop }))
    }
}

struct MqttSession {
    client: AsyncClient,
    eventloop: EventLoop,
}

#[async_trait]
impl TransportSession for MqttSession {
    async fn subscribe(&mut self, topics: &[String]) -> Result<(), IngestError> {
        let filters = topics
            .iter()
            .map(|topic| SubscribeFilter::new(topic.clone(), QoS::AtMostOnce));
        self.client
            .subscribe_many(filters)
            .await
            .map_err(|err| IngestError::Subscribe(err.to_string()))
    }

    async fn next_event(&mut self) -> TransportEvent {
        loop {
            match self.eventloop.poll().await {
                Ok(Event::Incoming(packet)) => {
                    if let Some(event) = incoming_event(packet) {
                        return event;
                    }
                }
                Ok(Event::Outgoing(_)) => {}
                Err(err) => return TransportEvent::Error(err.to_string()),
            }
        }
    }

    fn close(&mut self) {
        let _ = self.client.try_disconnect();
    }
}

/// 把收到的报文映射为会话事件；None 表示无需上报。
fn incoming_event(packet: Packet) -> Option<TransportEvent> {
    match packet {
        Packet::ConnAck(ack) if ack.code == ConnectReturnCode::Success => {
            Some(TransportEvent::Connected)
        }
        Packet::ConnAck(ack) => Some(TransportEvent::Error(format!(
            "connection refused: {:?}",
            ack.code
        ))),
        Packet::Publish(publish) => Some(TransportEvent::Message {
            topic: publish.topic,
            payload: publish.payload.to_vec(),
        }),
        Packet::SubAck(ack) => {
            let rejected = ack
                .return_codes
                .iter()
                .filter(|code| matches!(code, SubscribeReasonCode::Failure))
                .count();
            if rejected == 0 {
                debug!(target: "iot.ingest", pkid = ack.pkid, "mqtt_suback");
                return None;
            }
            Some(TransportEvent::SubscribeFailed(format!(
                "{rejected} of {} filters rejected",
                ack.return_codes.len()
            )))
        }
        Packet::Disconnect => Some(TransportEvent::Closed),
        _ => None,
    }
}

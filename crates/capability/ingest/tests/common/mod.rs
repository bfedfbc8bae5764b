//! 脚本化传输：按顺序消费预设的连接结果，记录每次建连的（虚拟）时间。

#![allow(dead_code)]

use async_trait::async_trait;
use iot_ingest::{
    BrokerEndpoint, ConnectOptions, IngestError, Transport, TransportEvent, TransportSession,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::time::Instant;

pub enum Attempt {
    /// 建连立即失败。
    Fail,
    /// 依次产出这些事件，之后关闭。
    Events(Vec<TransportEvent>),
    /// 由测试通过发送端实时推送事件；发送端 drop 即关闭。
    Live(mpsc::UnboundedReceiver<TransportEvent>),
}

pub struct ScriptedTransport {
    attempts: Mutex<VecDeque<Attempt>>,
    connects: AtomicUsize,
    connect_log: mpsc::UnboundedSender<Instant>,
    subscriptions: Arc<Mutex<Vec<Vec<String>>>>,
    fail_subscribe: bool,
}

impl ScriptedTransport {
    pub fn new(attempts: Vec<Attempt>) -> (Arc<Self>, mpsc::UnboundedReceiver<Instant>) {
        Self::build(attempts, false)
    }

    pub fn failing_subscribe(
        attempts: Vec<Attempt>,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<Instant>) {
        Self::build(attempts, true)
    }

    fn build(
        attempts: Vec<Attempt>,
        fail_subscribe: bool,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<Instant>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = Arc::new(Self {
            attempts: Mutex::new(attempts.into()),
            connects: AtomicUsize::new(0),
            connect_log: tx,
            subscriptions: Arc::new(Mutex::new(Vec::new())),
            fail_subscribe,
        });
        (transport, rx)
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn subscriptions(&self) -> Vec<Vec<String>> {
        self.subscriptions.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn connect(
        &self,
        _endpoint: &BrokerEndpoint,
        _options: &ConnectOptions,
    ) -> Result<Box<dyn TransportSession>, IngestError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let _ = self.connect_log.send(Instant::now());
        let attempt = self
            .attempts
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or(Attempt::Fail);
        let events = match attempt {
            Attempt::Fail => return Err(IngestError::Connect("refused".to_string())),
            Attempt::Events(events) => {
                let (tx, rx) = mpsc::unbounded_channel();
                for event in events {
                    let _ = tx.send(event);
                }
                rx
            }
            Attempt::Live(rx) => rx,
        };
        Ok(Box::new(ScriptedSession {
            events,
            subscriptions: self.subscriptions.clone(),
            fail_subscribe: self.fail_subscribe,
        }))
    }
}

struct ScriptedSession {
    events: mpsc::UnboundedReceiver<TransportEvent>,
    subscriptions: Arc<Mutex<Vec<Vec<String>>>>,
    fail_subscribe: bool,
}

#[async_trait]
impl TransportSession for ScriptedSession {
    async fn subscribe(&mut self, topics: &[String]) -> Result<(), IngestError> {
        self.subscriptions.lock().expect("lock").push(topics.to_vec());
        if self.fail_subscribe {
            return Err(IngestError::Subscribe("not authorized".to_string()));
        }
        Ok(())
    }

    async fn next_event(&mut self) -> TransportEvent {
        self.events.recv().await.unwrap_or(TransportEvent::Closed)
    }

    fn close(&mut self) {
        self.events.close();
    }
}

pub fn message(topic: &str, payload: &str) -> TransportEvent {
    TransportEvent::Message {
        topic: topic.to_string(),
        payload: payload.as_bytes().to_vec(),
    }
}

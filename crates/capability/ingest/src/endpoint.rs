//! Broker 地址解析
//!
//! 接受 `mqtt://`、`tcp://`、`mqtts://`、`ssl://`、`ws://`、`wss://` 形式，
//! 可带 `user:pass@` 与路径（websocket 使用）。

use crate::error::IngestError;
use std::fmt;

/// 连接协议。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerScheme {
    Tcp,
    Tls,
    Ws,
    Wss,
}

impl BrokerScheme {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "mqtt" | "tcp" => Some(Self::Tcp),
            "mqtts" | "ssl" | "tls" => Some(Self::Tls),
            "ws" => Some(Self::Ws),
            "wss" => Some(Self::Wss),
            _ => None,
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Self::Tcp => 1883,
            Self::Tls => 8883,
            Self::Ws => 80,
            Self::Wss => 443,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "mqtt",
            Self::Tls => "mqtts",
            Self::Ws => "ws",
            Self::Wss => "wss",
        }
    }

    pub fn is_websocket(self) -> bool {
        matches!(self, Self::Ws | Self::Wss)
    }
}

/// 已校验的 broker 地址。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerEndpoint {
    scheme: BrokerScheme,
    host: String,
    port: u16,
    path: String,
    credentials: Option<(String, String)>,
}

impl BrokerEndpoint {
    pub fn parse(input: &str) -> Result<Self, IngestError> {
        let url = input.trim();
        if url.is_empty() {
            return Err(IngestError::InvalidEndpoint("empty url".to_string()));
        }
        let (scheme, rest) = url
            .split_once("://")
            .ok_or_else(|| IngestError::InvalidEndpoint(format!("missing scheme: {url}")))?;
        let scheme = BrokerScheme::parse(scheme)
            .ok_or_else(|| IngestError::InvalidEndpoint(format!("unsupported scheme: {scheme}")))?;

        let (authority, path) = match rest.find(['/', '?']) {
            Some(index) => (&rest[..index], &rest[index..]),
            None => (rest, ""),
        };
        let (credentials, host_port) = match authority.rsplit_once('@') {
            Some((userinfo, host_port)) => {
                let (user, pass) = userinfo.split_once(':').unwrap_or((userinfo, ""));
                (Some((user.to_string(), pass.to_string())), host_port)
            }
            None => (None, authority),
        };
        let (host, port) = split_host_port(host_port, scheme.default_port())
            .ok_or_else(|| IngestError::InvalidEndpoint(format!("invalid host: {url}")))?;

        Ok(Self {
            scheme,
            host,
            port,
            path: path.to_string(),
            credentials,
        })
    }

    pub fn scheme(&self) -> BrokerScheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// URL 中携带的用户名与口令。
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.credentials
            .as_ref()
            .map(|(user, pass)| (user.as_str(), pass.as_str()))
    }

    /// 不含凭据的完整地址（websocket 传输需要）。
    pub fn url(&self) -> String {
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        format!("{}://{}:{}{}", self.scheme.as_str(), host, self.port, self.path)
    }
}

impl fmt::Display for BrokerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

fn split_host_port(value: &str, default_port: u16) -> Option<(String, u16)> {
    // IPv6: [::1]:1883
    if let Some(rest) = value.strip_prefix('[') {
        let (host, tail) = rest.split_once(']')?;
        let port = match tail.strip_prefix(':') {
            Some(port) => port.parse().ok()?,
            None if tail.is_empty() => default_port,
            None => return None,
        };
        return (!host.is_empty()).then(|| (host.to_string(), port));
    }
    let (host, port) = match value.rsplit_once(':') {
        Some((host, port)) => (host, port.parse().ok()?),
        None => (value, default_port),
    };
    if host.is_empty() || host.contains(':') {
        return None;
    }
    Some((host.to_string(), port))
}

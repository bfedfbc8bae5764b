/// 接入错误。
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("connect error: {0}")]
    Connect(String),
    #[error("subscribe error: {0}")]
    Subscribe(String),
}

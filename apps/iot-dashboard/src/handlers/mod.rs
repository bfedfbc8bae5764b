//! Handlers 模块

pub mod alerts;
pub mod dashboard;
pub mod health;
pub mod metrics;
pub mod realtime;

pub use alerts::*;
pub use dashboard::*;
pub use health::*;
pub use metrics::*;
pub use realtime::*;

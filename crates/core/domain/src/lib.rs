pub mod data;
pub mod topic;

pub use data::{AlertEvent, AlertKey, SensorMap, TelemetryReading};
pub use topic::parse_topic_filters;

//! 桥接服务共享的领域模型。

pub mod data;

pub use data::{ParsedValue, RawMessage, StatusEntry, TelemetryValue, now_epoch_ms};

//! # collectd 协议能力模块
//!
//! - **Topic 拆分**：MQTT topic → collectd `plugin_instance` / `type`
//! - **命令构造**：`PUTVAL "<host>/<plugin>-<instance>/<type>" <N|seconds>:<value>`
//! - **下游写入**：长连接 socket（TCP 或 Unix），断线重连
//!
//! ## 数据流
//!
//! ```text
//! topic ──► decompose_topic ──► DecomposedIdentifier
//!                                      │
//! value + timestamp ───────────► build_putval ──► DownstreamWriter ──► collectd
//! ```

mod command;
mod error;
mod topic;
mod types;
mod writer;

pub use command::{build_putval, collect_timestamp_secs, round_half_up};
pub use error::ProtocolError;
pub use topic::decompose_topic;
pub use types::*;
pub use writer::{DownstreamConfig, DownstreamWriter};

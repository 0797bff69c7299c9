//! 接入流水线：过滤 → 解析 → 更新缓存 → 拆分 topic → 构造 PUTVAL → 下发。
//!
//! 每条消息同步处理到结束（含投递），投递不等待下游确认。

use bridge_normalize::{NormalizeError, parse_payload};
use bridge_protocol::{
    DownstreamWriter, build_putval, collect_timestamp_secs, decompose_topic, round_half_up,
};
use bridge_storage::StatusStore;
use bridge_telemetry::{
    record_cache_update, record_command_built, record_command_emit_failure,
    record_command_enqueued, record_dropped_not_listed, record_dropped_retained,
    record_message_received,
};
use domain::{RawMessage, StatusEntry, now_epoch_ms};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 未配置下游时使用的 host。
pub const FALLBACK_HOST: &str = "localhost";
/// 未配置下游时使用的 plugin。
pub const FALLBACK_PLUGIN: &str = "my_plugin";

/// Pipeline 处理错误。
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("sink error: {0}")]
    Sink(String),
}

/// 命令下发抽象（不得阻塞）。
pub trait CommandSink: Send + Sync {
    fn emit(&self, line: &str) -> Result<(), PipelineError>;
}

impl CommandSink for DownstreamWriter {
    fn emit(&self, line: &str) -> Result<(), PipelineError> {
        self.send_line(line)
            .map_err(|err| PipelineError::Sink(err.to_string()))
    }
}

/// 下游 collectd 标识与写入端。
#[derive(Clone)]
pub struct Downstream {
    pub host: String,
    pub plugin: String,
    pub sink: Arc<dyn CommandSink>,
}

/// 单条消息的处理结果。
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// topic 不在白名单
    NotListed,
    /// 解析被拒绝
    Rejected(NormalizeError),
    /// 命令已进入下游写入队列
    Forwarded { command: String },
    /// 未配置下游，命令只做记录
    Computed { command: String },
    /// 投递失败（缓存已更新）
    EmitFailed { command: String, error: String },
}

struct PipelineInner {
    values: HashSet<String>,
    store: Arc<dyn StatusStore>,
    downstream: Option<Downstream>,
}

/// 接入流水线入口。
#[derive(Clone)]
pub struct Pipeline {
    inner: Arc<PipelineInner>,
}

impl Pipeline {
    pub fn new(
        values: impl IntoIterator<Item = String>,
        store: Arc<dyn StatusStore>,
        downstream: Option<Downstream>,
    ) -> Self {
        let inner = PipelineInner {
            values: values.into_iter().collect(),
            store,
            downstream,
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn is_listed(&self, topic: &str) -> bool {
        self.inner.values.contains(topic)
    }

    pub fn handle(&self, message: &RawMessage) -> IngestOutcome {
        record_message_received();
        let topic = message.topic.as_str();

        if !self.is_listed(topic) {
            record_dropped_not_listed();
            debug!(target: "bridge.ingest", topic = %topic, "message_not_listed");
            return IngestOutcome::NotListed;
        }

        let parsed = match parse_payload(&message.payload, message.retained) {
            Ok(parsed) => parsed,
            Err(err) => {
                record_dropped_retained();
                info!(
                    target: "bridge.ingest",
                    topic = %topic,
                    retained = message.retained,
                    reason = %err,
                    "message_skipped"
                );
                return IngestOutcome::Rejected(err);
            }
        };

        let collect_secs = parsed.timestamp_ms.map(collect_timestamp_secs);
        // 缓存只保存整数毫秒；秒级时间戳基于原始值计算
        let timestamp_ms = parsed
            .timestamp_ms
            .map(round_half_up)
            .unwrap_or_else(now_epoch_ms);
        self.inner.store.set(
            topic,
            StatusEntry {
                timestamp_ms,
                value: parsed.value.clone(),
            },
        );
        record_cache_update();
        info!(
            target: "bridge.ingest",
            topic = %topic,
            timestamp_ms = timestamp_ms,
            value = %parsed.value,
            "status_updated"
        );

        let id = decompose_topic(topic);
        let (host, plugin) = match &self.inner.downstream {
            Some(downstream) => (downstream.host.as_str(), downstream.plugin.as_str()),
            None => (FALLBACK_HOST, FALLBACK_PLUGIN),
        };
        let command = build_putval(
            host,
            plugin,
            &id.instance,
            &id.type_name,
            &parsed.value,
            collect_secs,
        );
        record_command_built();

        let Some(downstream) = &self.inner.downstream else {
            info!(target: "bridge.ingest", command = %command, "command_not_sent");
            return IngestOutcome::Computed { command };
        };

        match downstream.sink.emit(&command) {
            Ok(()) => {
                record_command_enqueued();
                info!(target: "bridge.ingest", command = %command, "command_sent");
                IngestOutcome::Forwarded { command }
            }
            Err(err) => {
                record_command_emit_failure();
                warn!(
                    target: "bridge.ingest",
                    command = %command,
                    error = %err,
                    "command_send_failed"
                );
                IngestOutcome::EmitFailed {
                    command,
                    error: err.to_string(),
                }
            }
        }
    }
}

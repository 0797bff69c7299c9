//! 追踪、请求 ID 与基础计数器。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 计数器快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub messages_received: u64,
    pub dropped_not_listed: u64,
    pub dropped_retained: u64,
    pub cache_updates: u64,
    pub commands_built: u64,
    pub commands_enqueued: u64,
    pub commands_emitted: u64,
    pub command_emit_failures: u64,
}

/// 进程级计数器。
#[derive(Default)]
pub struct TelemetryMetrics {
    messages_received: AtomicU64,
    dropped_not_listed: AtomicU64,
    dropped_retained: AtomicU64,
    cache_updates: AtomicU64,
    commands_built: AtomicU64,
    commands_enqueued: AtomicU64,
    commands_emitted: AtomicU64,
    command_emit_failures: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_received: self.messages_received.load(Ordering::Relaxed),
            dropped_not_listed: self.dropped_not_listed.load(Ordering::Relaxed),
            dropped_retained: self.dropped_retained.load(Ordering::Relaxed),
            cache_updates: self.cache_updates.load(Ordering::Relaxed),
            commands_built: self.commands_built.load(Ordering::Relaxed),
            commands_enqueued: self.commands_enqueued.load(Ordering::Relaxed),
            commands_emitted: self.commands_emitted.load(Ordering::Relaxed),
            command_emit_failures: self.command_emit_failures.load(Ordering::Relaxed),
        }
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局计数器实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录收到的总线消息数。
pub fn record_message_received() {
    metrics().messages_received.fetch_add(1, Ordering::Relaxed);
}

/// 记录不在白名单中被丢弃的消息数。
pub fn record_dropped_not_listed() {
    metrics().dropped_not_listed.fetch_add(1, Ordering::Relaxed);
}

/// 记录因 retain 且无时间戳被丢弃的消息数。
pub fn record_dropped_retained() {
    metrics().dropped_retained.fetch_add(1, Ordering::Relaxed);
}

/// 记录状态缓存写入次数。
pub fn record_cache_update() {
    metrics().cache_updates.fetch_add(1, Ordering::Relaxed);
}

/// 记录构造的 PUTVAL 命令数。
pub fn record_command_built() {
    metrics().commands_built.fetch_add(1, Ordering::Relaxed);
}

/// 记录交给下游写入队列的命令数。
pub fn record_command_enqueued() {
    metrics().commands_enqueued.fetch_add(1, Ordering::Relaxed);
}

/// 记录已写入下游 socket 的命令数。
pub fn record_command_emitted() {
    metrics().commands_emitted.fetch_add(1, Ordering::Relaxed);
}

/// 记录下游写入失败次数。
pub fn record_command_emit_failure() {
    metrics()
        .command_emit_failures
        .fetch_add(1, Ordering::Relaxed);
}

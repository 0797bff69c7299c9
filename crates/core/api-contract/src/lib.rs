//! 稳定的 HTTP DTO 契约。

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// 能够无损表示为 JSON 整数的最大绝对值（2^53）。
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// GET /status 响应体：topic → 最新值。
pub type StatusDocument = BTreeMap<String, StatusEntryDto>;

/// 单个 topic 的最新值。
#[derive(Debug, Clone, Serialize)]
pub struct StatusEntryDto {
    pub timestamp: i64,
    pub value: StatusValueDto,
}

/// 状态值：数值或文本。
///
/// 整数值输出为 JSON 整数（`42` 而非 `42.0`）。
#[derive(Debug, Clone, PartialEq)]
pub enum StatusValueDto {
    Number(f64),
    Text(String),
}

impl Serialize for StatusValueDto {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StatusValueDto::Number(v) if v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*v as i64)
            }
            StatusValueDto::Number(v) => serializer.serialize_f64(*v),
            StatusValueDto::Text(v) => serializer.serialize_str(v),
        }
    }
}

/// 健康检查响应体。
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// 指标快照响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub messages_received: u64,
    pub dropped_not_listed: u64,
    pub dropped_retained: u64,
    pub cache_updates: u64,
    pub commands_built: u64,
    pub commands_enqueued: u64,
    pub commands_emitted: u64,
    pub command_emit_failures: u64,
}

use std::fmt;

/// 总线投递的原始消息。
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub topic: String,
    pub payload: Vec<u8>,
    /// broker 以 last-known-value 方式重放（而非实时发布）时为 true。
    pub retained: bool,
}

impl RawMessage {
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>, retained: bool) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
            retained,
        }
    }
}

/// 遥测值：数值或原样文本。
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for TelemetryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryValue::Number(v) => write!(f, "{}", v),
            TelemetryValue::Text(v) => f.write_str(v),
        }
    }
}

/// 解析后的值。
///
/// `timestamp_ms` 仅在报文显式携带时存在（保留原始精度）；缺省时由接入链路补当前时间。
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedValue {
    pub value: TelemetryValue,
    pub timestamp_ms: Option<f64>,
}

/// 每个 topic 的最新值。
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEntry {
    pub timestamp_ms: i64,
    pub value: TelemetryValue,
}

/// 当前 Unix 时间戳（毫秒）。
pub fn now_epoch_ms() -> i64 {
    let now = std::time::SystemTime::now();
    let duration = now
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    duration.as_millis() as i64
}

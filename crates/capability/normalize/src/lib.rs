//! 报文解析：结构化 JSON（带时间戳）优先，回退到旧式标量。

use domain::{ParsedValue, TelemetryValue};
use serde_json::Value;

/// 解析错误。
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// retain 重放的旧式报文没有可信的时间戳。
    #[error("retained payload without timestamp")]
    RetainedWithoutTimestamp,
}

/// 解析一条消息的载荷。
///
/// 1. JSON 对象同时含 `timestamp`（数值，毫秒）与 `value`（数值或字符串）时按结构化报文处理；
/// 2. 否则 retain 消息直接拒绝；
/// 3. 否则按旧式标量：能解析为有限数值则为数值，否则原样作为文本，时间戳留空。
pub fn parse_payload(payload: &[u8], retained: bool) -> Result<ParsedValue, NormalizeError> {
    if let Some(parsed) = parse_structured(payload) {
        return Ok(parsed);
    }
    if retained {
        return Err(NormalizeError::RetainedWithoutTimestamp);
    }
    Ok(ParsedValue {
        value: parse_scalar(payload),
        timestamp_ms: None,
    })
}

fn parse_structured(payload: &[u8]) -> Option<ParsedValue> {
    let document: Value = serde_json::from_slice(payload).ok()?;
    let object = document.as_object()?;
    let timestamp = object.get("timestamp")?.as_f64()?;
    let value = match object.get("value")? {
        Value::Number(number) => TelemetryValue::Number(number.as_f64()?),
        Value::String(text) => TelemetryValue::Text(text.clone()),
        _ => return None,
    };
    Some(ParsedValue {
        value,
        timestamp_ms: Some(timestamp),
    })
}

/// 旧式标量：有限数值优先，其余原样保留。
pub fn parse_scalar(payload: &[u8]) -> TelemetryValue {
    let text = String::from_utf8_lossy(payload);
    match text.trim().parse::<f64>() {
        Ok(number) if number.is_finite() => TelemetryValue::Number(number),
        _ => TelemetryValue::Text(text.into_owned()),
    }
}

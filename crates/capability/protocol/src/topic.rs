//! MQTT topic → collectd 标识拆分

use crate::types::DecomposedIdentifier;

const RELAY_SEGMENT: &str = "relay";
const STATE_SEGMENT: &str = "state";

/// 拆分 topic。
///
/// - 第一段为 instance（`-` 替换为 `_`）；
/// - 第二段为 `relay` 时改写为 `state`，其余各段以 `-` 连接作为 type；
/// - 否则只取最后一段作为 type，中间段丢弃（仅适配三段式 topic 的约定）。
///
/// 只有一段时 type 为空串，不视为错误。
pub fn decompose_topic(topic: &str) -> DecomposedIdentifier {
    let mut segments = topic.split('/');
    let instance = segments.next().unwrap_or_default().replace('-', "_");
    let mut rest: Vec<&str> = segments.collect();

    let type_name = match rest.first() {
        Some(first) if *first == RELAY_SEGMENT => {
            rest[0] = STATE_SEGMENT;
            rest.join("-")
        }
        _ => rest.last().map(|segment| segment.to_string()).unwrap_or_default(),
    };

    DecomposedIdentifier {
        instance,
        type_name,
    }
}

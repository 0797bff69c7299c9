use api_contract::{MetricsSnapshotDto, StatusDocument, StatusEntryDto, StatusValueDto};
use serde_json::{Value, json};

#[test]
fn empty_status_is_empty_object() {
    let document = StatusDocument::new();
    let value = serde_json::to_value(document).expect("serialize");
    assert_eq!(value, json!({}));
}

#[test]
fn integral_number_serializes_as_integer() {
    let entry = StatusEntryDto {
        timestamp: 1000,
        value: StatusValueDto::Number(42.0),
    };
    let text = serde_json::to_string(&entry).expect("serialize");
    assert_eq!(text, r#"{"timestamp":1000,"value":42}"#);
}

#[test]
fn fractional_number_serializes_as_float() {
    let entry = StatusEntryDto {
        timestamp: 1000,
        value: StatusValueDto::Number(3.5),
    };
    let value = serde_json::to_value(entry).expect("serialize");
    assert_eq!(value["value"], json!(3.5));
}

#[test]
fn text_serializes_as_string() {
    let mut document = StatusDocument::new();
    document.insert(
        "sensor-a/relay/switch".to_string(),
        StatusEntryDto {
            timestamp: 5,
            value: StatusValueDto::Text("on".to_string()),
        },
    );
    let value = serde_json::to_value(document).expect("serialize");
    assert_eq!(
        value,
        json!({"sensor-a/relay/switch": {"timestamp": 5, "value": "on"}})
    );
}

#[test]
fn huge_number_stays_float() {
    let value = serde_json::to_value(StatusValueDto::Number(1e20)).expect("serialize");
    assert!(matches!(value, Value::Number(ref n) if n.is_f64()));
}

#[test]
fn metrics_snapshot_is_camel_case() {
    let dto = MetricsSnapshotDto {
        messages_received: 1,
        dropped_not_listed: 0,
        dropped_retained: 0,
        cache_updates: 1,
        commands_built: 1,
        commands_enqueued: 1,
        commands_emitted: 1,
        command_emit_failures: 0,
    };
    let value = serde_json::to_value(dto).expect("serialize");
    assert!(value.get("messagesReceived").is_some());
    assert!(value.get("commandEmitFailures").is_some());
    assert!(value.get("messages_received").is_none());
}

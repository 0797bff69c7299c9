use domain::{RawMessage, TelemetryValue, now_epoch_ms};

#[test]
fn number_display_drops_trailing_zero() {
    assert_eq!(TelemetryValue::Number(42.0).to_string(), "42");
    assert_eq!(TelemetryValue::Number(3.5).to_string(), "3.5");
    assert_eq!(TelemetryValue::Number(-0.25).to_string(), "-0.25");
}

#[test]
fn text_display_is_verbatim() {
    let value = TelemetryValue::Text(" on ".to_string());
    assert_eq!(value.to_string(), " on ");
}

#[test]
fn raw_message_builds() {
    let message = RawMessage::new("sensor-a/temp/outdoor", "3.5", true);
    assert_eq!(message.topic, "sensor-a/temp/outdoor");
    assert_eq!(message.payload, b"3.5".to_vec());
    assert!(message.retained);
}

#[test]
fn now_is_after_2020() {
    assert!(now_epoch_ms() > 1_577_836_800_000);
}

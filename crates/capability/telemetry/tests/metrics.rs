use bridge_telemetry::{
    metrics, record_command_emitted, record_command_enqueued, record_message_received,
};

#[test]
fn counters_only_grow() {
    let before = metrics().snapshot();
    record_message_received();
    record_command_enqueued();
    record_command_emitted();
    let after = metrics().snapshot();
    assert!(after.commands_enqueued > before.commands_enqueued);
    assert!(after.messages_received > before.messages_received);
    assert!(after.commands_emitted > before.commands_emitted);
}

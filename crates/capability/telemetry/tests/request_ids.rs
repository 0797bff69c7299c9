use bridge_telemetry::{init_tracing, new_request_ids};

#[test]
fn each_call_yields_distinct_ids() {
    let first = new_request_ids();
    let second = new_request_ids();
    assert!(!first.request_id.is_empty());
    assert_ne!(first.request_id, first.trace_id);
    assert_ne!(first.request_id, second.request_id);
    assert_ne!(first.trace_id, second.trace_id);
}

#[test]
fn init_tracing_twice_keeps_first_subscriber() {
    init_tracing();
    init_tracing();
    tracing::info!(target: "bridge.test", "subscriber_ready");
}

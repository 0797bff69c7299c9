use bridge_pipeline::{Downstream, IngestOutcome, Pipeline};
use bridge_protocol::{DownstreamAddress, DownstreamConfig, DownstreamWriter};
use bridge_storage::StatusCache;
use domain::RawMessage;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;

#[tokio::test]
async fn pipeline_writes_putval_to_socket() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (writer, _task) = DownstreamWriter::spawn(DownstreamConfig {
        address: DownstreamAddress::Tcp(addr.to_string()),
        reconnect_interval_ms: 50,
    });

    let store = Arc::new(StatusCache::new());
    let pipeline = Pipeline::new(
        vec!["garden/temp/soil".to_string()],
        store.clone(),
        Some(Downstream {
            host: "localhost".to_string(),
            plugin: "mqtt".to_string(),
            sink: Arc::new(writer),
        }),
    );

    let outcome = pipeline.handle(&RawMessage::new(
        "garden/temp/soil",
        r#"{"timestamp": 1700000000499, "value": 12.25}"#,
        false,
    ));
    assert!(matches!(outcome, IngestOutcome::Forwarded { .. }));

    let (stream, _) = listener.accept().await.expect("accept");
    let mut lines = BufReader::new(stream).lines();
    let line = lines.next_line().await.expect("read").expect("line");
    assert_eq!(line, "PUTVAL \"localhost/mqtt-garden/soil\" 1700000000:12.25");
}

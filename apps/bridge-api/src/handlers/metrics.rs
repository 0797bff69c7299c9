//! 计数器快照
//!
//! - GET /metrics

use api_contract::MetricsSnapshotDto;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bridge_telemetry::metrics;

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(MetricsSnapshotDto {
            messages_received: snapshot.messages_received,
            dropped_not_listed: snapshot.dropped_not_listed,
            dropped_retained: snapshot.dropped_retained,
            cache_updates: snapshot.cache_updates,
            commands_built: snapshot.commands_built,
            commands_enqueued: snapshot.commands_enqueued,
            commands_emitted: snapshot.commands_emitted,
            command_emit_failures: snapshot.command_emit_failures,
        }),
    )
        .into_response()
}

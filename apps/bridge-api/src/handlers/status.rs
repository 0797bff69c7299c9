//! 最新值查询
//!
//! - GET /status：`{ "<topic>": { "timestamp": <ms>, "value": <number|string> } }`
//!
//! 无失败分支，空缓存返回 `{}`；附带 `Access-Control-Allow-Origin: *`。

use crate::AppState;
use api_contract::{StatusDocument, StatusEntryDto, StatusValueDto};
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use domain::TelemetryValue;

pub async fn get_status(State(state): State<AppState>) -> Response {
    let document: StatusDocument = state
        .status
        .snapshot()
        .into_iter()
        .map(|(topic, entry)| {
            let value = match entry.value {
                TelemetryValue::Number(v) => StatusValueDto::Number(v),
                TelemetryValue::Text(v) => StatusValueDto::Text(v),
            };
            (
                topic,
                StatusEntryDto {
                    timestamp: entry.timestamp_ms,
                    value,
                },
            )
        })
        .collect();
    (
        StatusCode::OK,
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(document),
    )
        .into_response()
}

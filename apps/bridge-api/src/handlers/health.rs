use api_contract::HealthResponse;
use axum::{Json, response::IntoResponse};

pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { ok: true })
}

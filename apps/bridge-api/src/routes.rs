//! 路由定义
//!
//! - GET /status：topic 最新值
//! - GET /health：健康检查
//! - GET /metrics：计数器快照

use super::AppState;
use super::handlers::*;
use super::middleware::request_context;
use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(get_status))
        .route("/health", get(health))
        .route("/metrics", get(get_metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 注入 request_id/trace_id
        .layer(middleware::from_fn(request_context))
}

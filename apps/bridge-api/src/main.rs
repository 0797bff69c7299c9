//! MQTT → collectd 桥接服务：订阅 MQTT，转发 PUTVAL，并通过 HTTP 暴露最新值。

mod handlers;
mod ingest;
mod middleware;
mod routes;

use bridge_config::AppConfig;
use bridge_storage::{StatusCache, StatusStore};
use bridge_telemetry::init_tracing;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    /// 最新值缓存（只读）
    pub status: Arc<dyn StatusStore>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 配置文件或环境变量
    let config = AppConfig::load()?;
    // 初始化结构化日志
    init_tracing();

    // 进程级最新值缓存：写入方为接入链路，读取方为 /status
    let status = Arc::new(StatusCache::new());
    let _ingest = ingest::spawn_ingest(&config, status.clone())?;

    let app = routes::create_router(AppState { status });
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(target: "bridge.http", "Server listening on: http://{}", config.http_addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

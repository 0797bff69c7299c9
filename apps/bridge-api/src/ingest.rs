//! 采集链路装配模块
//!
//! 将 MQTT 采集源、接入流水线、状态缓存与 collectd 下游写入端组装在一起。

use bridge_config::AppConfig;
use bridge_ingest::{IngestError, MqttSource, MqttSourceConfig, RawMessageHandler, Source};
use bridge_pipeline::{Downstream, Pipeline};
use bridge_protocol::{DownstreamAddress, DownstreamConfig, DownstreamWriter, ProtocolError};
use bridge_storage::StatusStore;
use std::sync::Arc;
use tracing::{info, warn};

/// 流水线处理器
///
/// 采集源对每条消息 await 本处理器，处理完成后才读取下一条。
struct PipelineHandler {
    pipeline: Pipeline,
}

#[async_trait::async_trait]
impl RawMessageHandler for PipelineHandler {
    async fn handle(&self, message: domain::RawMessage) -> Result<(), IngestError> {
        // 丢弃与投递失败均已在流水线内记录，不向采集源传播
        self.pipeline.handle(&message);
        Ok(())
    }
}

/// 构造下游写入端；未配置 collectd 时返回 None。
fn build_downstream(config: &AppConfig) -> Result<Option<Downstream>, ProtocolError> {
    let Some(collectd) = config.collectd.as_ref() else {
        info!(target: "bridge.downstream", "collectd not configured, commands are logged only");
        return Ok(None);
    };
    let address = DownstreamAddress::parse(&collectd.address)?;
    info!(
        target: "bridge.downstream",
        address = %address,
        host = %collectd.host,
        plugin = %collectd.plugin,
        "collectd downstream"
    );
    let (writer, _task) = DownstreamWriter::spawn(DownstreamConfig {
        address,
        reconnect_interval_ms: collectd.reconnect_interval_ms,
    });
    Ok(Some(Downstream {
        host: collectd.host.clone(),
        plugin: collectd.plugin.clone(),
        sink: Arc::new(writer),
    }))
}

/// 启动采集任务
///
/// # 参数
/// - `config`: 应用程序统一配置
/// - `status`: 最新值缓存（流水线独占写入）
pub fn spawn_ingest(
    config: &AppConfig,
    status: Arc<dyn StatusStore>,
) -> Result<tokio::task::JoinHandle<()>, ProtocolError> {
    let downstream = build_downstream(config)?;
    let pipeline = Pipeline::new(config.mqtt_values.iter().cloned(), status, downstream);
    let handler = Arc::new(PipelineHandler { pipeline });

    let source = MqttSource::new(MqttSourceConfig {
        host: config.mqtt_host.clone(),
        port: config.mqtt_port,
        username: config.mqtt_username.clone(),
        password: config.mqtt_password.clone(),
        client_id: config.mqtt_client_id.clone(),
        topics: config.mqtt_topics.clone(),
    });
    info!(
        target: "bridge.ingest",
        "ingest source: mqtt {}:{} topics={:?} values={:?}",
        config.mqtt_host, config.mqtt_port, config.mqtt_topics, config.mqtt_values
    );

    Ok(tokio::spawn(async move {
        if let Err(err) = source.run(handler).await {
            warn!(target: "bridge.ingest", "ingest stopped: {}", err);
        }
    }))
}

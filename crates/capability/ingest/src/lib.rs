use async_trait::async_trait;
use domain::RawMessage;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS, SubscribeFilter};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const KEEP_ALIVE: Duration = Duration::from_secs(30);
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// 采集错误。
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("handler error: {0}")]
    Handler(String),
    #[error("source error: {0}")]
    Source(String),
}

/// RawMessage 处理器。
///
/// 消息逐条投递，上一条处理完成前不会投递下一条。
#[async_trait]
pub trait RawMessageHandler: Send + Sync {
    async fn handle(&self, message: RawMessage) -> Result<(), IngestError>;
}

/// 采集源抽象。
#[async_trait]
pub trait Source: Send + Sync {
    async fn run(&self, handler: Arc<dyn RawMessageHandler>) -> Result<(), IngestError>;
}

/// 占位源（用于接线与测试）。
#[derive(Debug, Default)]
pub struct NoopSource;

#[async_trait]
impl Source for NoopSource {
    async fn run(&self, _handler: Arc<dyn RawMessageHandler>) -> Result<(), IngestError> {
        Ok(())
    }
}

/// MQTT 采集源配置。
#[derive(Debug, Clone)]
pub struct MqttSourceConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: Option<String>,
    /// 订阅的 topic 过滤器（可含 `+`/`#`）。
    pub topics: Vec<String>,
}

/// MQTT 采集源。
#[derive(Debug, Clone)]
pub struct MqttSource {
    config: MqttSourceConfig,
}

impl MqttSource {
    pub fn new(config: MqttSourceConfig) -> Self {
        Self { config }
    }

    fn options(&self) -> MqttOptions {
        let client_id = self
            .config
            .client_id
            .clone()
            .unwrap_or_else(|| format!("mqtt-collectd-bridge-{}", uuid::Uuid::new_v4()));
        let mut options = MqttOptions::new(client_id, self.config.host.clone(), self.config.port);
        options.set_keep_alive(KEEP_ALIVE);
        if let Some(username) = self.config.username.as_ref() {
            options.set_credentials(
                username.clone(),
                self.config.password.clone().unwrap_or_default(),
            );
        }
        options
    }

    /// 每次 ConnAck 后重新订阅全部过滤器（单个 SUBSCRIBE）。
    async fn subscribe_all(&self, client: &AsyncClient) -> Result<(), IngestError> {
        let filters = subscribe_filters(&self.config.topics);
        if filters.is_empty() {
            warn!(target: "bridge.ingest", "no mqtt topics configured");
            return Ok(());
        }
        for topic in &self.config.topics {
            info!(target: "bridge.ingest", topic = %topic, "subscribing");
        }
        client
            .subscribe_many(filters)
            .await
            .map_err(|err| IngestError::Source(err.to_string()))
    }
}

#[async_trait]
impl Source for MqttSource {
    async fn run(&self, handler: Arc<dyn RawMessageHandler>) -> Result<(), IngestError> {
        let (client, mut eventloop) = AsyncClient::new(self.options(), 10);

        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!(
                        target: "bridge.ingest",
                        host = %self.config.host,
                        port = self.config.port,
                        "mqtt connected"
                    );
                    self.subscribe_all(&client).await?;
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    let message = RawMessage {
                        topic: publish.topic.clone(),
                        payload: publish.payload.to_vec(),
                        retained: publish.retain,
                    };
                    if let Err(err) = handler.handle(message).await {
                        warn!(target: "bridge.ingest", topic = %publish.topic, error = %err, "raw message handler failed");
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(target: "bridge.ingest", error = %err, "mqtt eventloop error");
                    tokio::time::sleep(RECONNECT_DELAY).await;
                }
            }
        }
    }
}

/// 构造订阅过滤器（QoS 0），忽略空白项。
pub fn subscribe_filters(topics: &[String]) -> Vec<SubscribeFilter> {
    topics
        .iter()
        .map(|topic| topic.trim())
        .filter(|topic| !topic.is_empty())
        .map(|topic| SubscribeFilter::new(topic.to_string(), QoS::AtMostOnce))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> MqttSourceConfig {
        MqttSourceConfig {
            host: "broker.local".to_string(),
            port: 1884,
            username: None,
            password: None,
            client_id: Some("bridge-test".to_string()),
            topics: vec!["sensor-a/#".to_string(), " ".to_string()],
        }
    }

    #[test]
    fn options_use_configured_broker() {
        let source = MqttSource::new(sample_config());
        let options = source.options();
        assert_eq!(
            options.broker_address(),
            ("broker.local".to_string(), 1884)
        );
        assert_eq!(options.client_id(), "bridge-test");
        assert_eq!(options.keep_alive(), KEEP_ALIVE);
    }

    #[test]
    fn generated_client_id_is_unique() {
        let mut config = sample_config();
        config.client_id = None;
        let source = MqttSource::new(config);
        assert_ne!(source.options().client_id(), source.options().client_id());
    }

    #[test]
    fn filters_skip_blank_topics() {
        let filters = subscribe_filters(&sample_config().topics);
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].path, "sensor-a/#");
        assert_eq!(filters[0].qos, QoS::AtMostOnce);
    }
}

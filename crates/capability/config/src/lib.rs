//! 应用运行配置加载。
//!
//! 优先读取 `BRIDGE_CONFIG_FILE` 指向的 JSON 配置文件，否则读取 `BRIDGE_*` 环境变量。

use serde::Deserialize;
use std::env;
use std::path::Path;

const DEFAULT_MQTT_URL: &str = "mqtt://127.0.0.1:1883";
const DEFAULT_MQTT_PORT: u16 = 1883;
const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_COLLECTD_HOST: &str = "localhost";
const DEFAULT_COLLECTD_PLUGIN: &str = "my_plugin";
const DEFAULT_COLLECTD_RECONNECT_MS: u64 = 5000;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
    #[error("config file error: {0}")]
    File(String),
}

/// collectd 下游配置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectdConfig {
    /// `host:port` 或 `unix:/path/to/socket`
    pub address: String,
    pub host: String,
    pub plugin: String,
    pub reconnect_interval_ms: u64,
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub mqtt_username: Option<String>,
    pub mqtt_password: Option<String>,
    pub mqtt_client_id: Option<String>,
    /// 订阅的 topic 过滤器（可含通配符）。
    pub mqtt_topics: Vec<String>,
    /// 承载数值的 topic 白名单（精确匹配）。
    pub mqtt_values: Vec<String>,
    /// 未配置时不向下游发送，仅构造并记录命令。
    pub collectd: Option<CollectdConfig>,
}

/// MQTT broker 地址。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerAddress {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl AppConfig {
    /// 按 `BRIDGE_CONFIG_FILE` 是否存在选择配置来源。
    pub fn load() -> Result<Self, ConfigError> {
        match read_optional("BRIDGE_CONFIG_FILE") {
            Some(path) => Self::from_file(path),
            None => Self::from_env(),
        }
    }

    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let mqtt_url = env::var("BRIDGE_MQTT_URL").unwrap_or_else(|_| DEFAULT_MQTT_URL.to_string());
        let broker = parse_broker_url(&mqtt_url)
            .map_err(|_| ConfigError::Invalid("BRIDGE_MQTT_URL".to_string(), mqtt_url.clone()))?;
        let mqtt_topics = read_list("BRIDGE_MQTT_TOPICS")
            .ok_or_else(|| ConfigError::Missing("BRIDGE_MQTT_TOPICS".to_string()))?;
        let mqtt_values = read_list("BRIDGE_MQTT_VALUES").unwrap_or_else(|| mqtt_topics.clone());
        let mqtt_client_id = read_optional("BRIDGE_MQTT_CLIENT_ID");
        let http_addr =
            env::var("BRIDGE_HTTP_ADDR").unwrap_or_else(|_| DEFAULT_HTTP_ADDR.to_string());

        let collectd = match read_optional("BRIDGE_COLLECTD_ADDR") {
            Some(address) => Some(CollectdConfig {
                address,
                host: env::var("BRIDGE_COLLECTD_HOST")
                    .unwrap_or_else(|_| DEFAULT_COLLECTD_HOST.to_string()),
                plugin: env::var("BRIDGE_COLLECTD_PLUGIN")
                    .unwrap_or_else(|_| DEFAULT_COLLECTD_PLUGIN.to_string()),
                reconnect_interval_ms: read_u64_with_default(
                    "BRIDGE_COLLECTD_RECONNECT_MS",
                    DEFAULT_COLLECTD_RECONNECT_MS,
                )?,
            }),
            None => None,
        };

        Ok(Self {
            http_addr,
            mqtt_host: broker.host,
            mqtt_port: broker.port,
            mqtt_username: broker.username,
            mqtt_password: broker.password,
            mqtt_client_id,
            mqtt_topics,
            mqtt_values,
            collectd,
        })
    }

    /// 从 JSON 配置文件读取配置。
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::File(format!("{}: {}", path.display(), err)))?;
        Self::from_json_str(&text)
    }

    /// 解析 JSON 配置文本。
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let file: FileConfig =
            serde_json::from_str(text).map_err(|err| ConfigError::File(err.to_string()))?;
        let broker = parse_broker_url(&file.mqtt.url)?;
        let mqtt_values = file
            .mqtt
            .values
            .unwrap_or_else(|| file.mqtt.topics.clone());
        let collectd = file.collectd.map(|collectd| CollectdConfig {
            address: collectd.address,
            host: collectd.host,
            plugin: collectd.plugin,
            reconnect_interval_ms: collectd.reconnect_interval_ms,
        });
        Ok(Self {
            http_addr: format!("{}:{}", file.listen.hostname, file.listen.port),
            mqtt_host: broker.host,
            mqtt_port: broker.port,
            mqtt_username: broker.username,
            mqtt_password: broker.password,
            mqtt_client_id: file.mqtt.client_id,
            mqtt_topics: file.mqtt.topics,
            mqtt_values,
            collectd,
        })
    }
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    mqtt: FileMqtt,
    listen: FileListen,
    #[serde(default)]
    collectd: Option<FileCollectd>,
}

#[derive(Debug, Deserialize)]
struct FileMqtt {
    url: String,
    topics: Vec<String>,
    #[serde(default)]
    values: Option<Vec<String>>,
    #[serde(default)]
    client_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileListen {
    hostname: String,
    port: u16,
}

#[derive(Debug, Deserialize)]
struct FileCollectd {
    address: String,
    #[serde(default = "default_collectd_host")]
    host: String,
    #[serde(default = "default_collectd_plugin")]
    plugin: String,
    #[serde(default = "default_collectd_reconnect_ms")]
    reconnect_interval_ms: u64,
}

fn default_collectd_host() -> String {
    DEFAULT_COLLECTD_HOST.to_string()
}

fn default_collectd_plugin() -> String {
    DEFAULT_COLLECTD_PLUGIN.to_string()
}

fn default_collectd_reconnect_ms() -> u64 {
    DEFAULT_COLLECTD_RECONNECT_MS
}

/// 解析 `mqtt://[user[:password]@]host[:port]`（也接受 `tcp://` 或无 scheme）。
pub fn parse_broker_url(url: &str) -> Result<BrokerAddress, ConfigError> {
    let invalid = || ConfigError::Invalid("mqtt url".to_string(), url.to_string());
    let trimmed = url.trim();
    let rest = match trimmed.split_once("://") {
        Some(("mqtt" | "tcp", rest)) => rest,
        Some(_) => return Err(invalid()),
        None => trimmed,
    };
    let rest = rest.split('/').next().unwrap_or_default();

    let (credentials, authority) = match rest.rsplit_once('@') {
        Some((credentials, authority)) => (Some(credentials), authority),
        None => (None, rest),
    };
    let (username, password) = match credentials {
        Some(credentials) => match credentials.split_once(':') {
            Some((user, pass)) => (Some(user.to_string()), Some(pass.to_string())),
            None => (Some(credentials.to_string()), None),
        },
        None => (None, None),
    };

    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => (host, port.parse::<u16>().map_err(|_| invalid())?),
        None => (authority, DEFAULT_MQTT_PORT),
    };
    if host.is_empty() {
        return Err(invalid());
    }

    Ok(BrokerAddress {
        host: host.to_string(),
        port,
        username: username.filter(|value| !value.is_empty()),
        password,
    })
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

/// 读取逗号分隔列表；空列表视为未配置。
fn read_list(key: &str) -> Option<Vec<String>> {
    let value = read_optional(key)?;
    let items: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() { None } else { Some(items) }
}

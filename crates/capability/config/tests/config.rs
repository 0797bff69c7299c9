use bridge_config::AppConfig;

#[test]
fn load_config_from_env() {
    // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::set_var("BRIDGE_MQTT_URL", "mqtt://broker:1884");
        std::env::set_var("BRIDGE_MQTT_TOPICS", "home/#, garden/temp/outdoor");
        std::env::set_var("BRIDGE_MQTT_VALUES", "home/relay/switch,garden/temp/outdoor");
        std::env::set_var("BRIDGE_HTTP_ADDR", "127.0.0.1:8081");
        std::env::set_var("BRIDGE_COLLECTD_ADDR", "127.0.0.1:25826");
        std::env::set_var("BRIDGE_COLLECTD_PLUGIN", "mqtt");
    }

    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.http_addr, "127.0.0.1:8081");
    assert_eq!(config.mqtt_host, "broker");
    assert_eq!(config.mqtt_port, 1884);
    assert_eq!(config.mqtt_topics, vec!["home/#", "garden/temp/outdoor"]);
    assert_eq!(
        config.mqtt_values,
        vec!["home/relay/switch", "garden/temp/outdoor"]
    );
    let collectd = config.collectd.expect("collectd");
    assert_eq!(collectd.address, "127.0.0.1:25826");
    assert_eq!(collectd.host, "localhost");
    assert_eq!(collectd.plugin, "mqtt");
    assert_eq!(collectd.reconnect_interval_ms, 5000);
}

#[test]
fn load_config_from_json() {
    let text = r#"{
        "mqtt": {
            "url": "mqtt://127.0.0.1",
            "topics": ["sensor-a/#"],
            "values": ["sensor-a/temp/outdoor"]
        },
        "listen": { "hostname": "0.0.0.0", "port": 8090 },
        "collectd": { "address": "unix:/var/run/collectd-unixsock", "host": "pi" }
    }"#;
    let config = AppConfig::from_json_str(text).expect("config");
    assert_eq!(config.http_addr, "0.0.0.0:8090");
    assert_eq!(config.mqtt_port, 1883);
    assert_eq!(config.mqtt_values, vec!["sensor-a/temp/outdoor"]);
    let collectd = config.collectd.expect("collectd");
    assert_eq!(collectd.host, "pi");
    assert_eq!(collectd.plugin, "my_plugin");
}

#[test]
fn json_without_collectd_disables_downstream() {
    let text = r#"{
        "mqtt": { "url": "mqtt://127.0.0.1:1883", "topics": ["a/b"] },
        "listen": { "hostname": "127.0.0.1", "port": 8080 }
    }"#;
    let config = AppConfig::from_json_str(text).expect("config");
    assert!(config.collectd.is_none());
    assert_eq!(config.mqtt_values, vec!["a/b"]);
}

#[test]
fn json_missing_listen_is_error() {
    let text = r#"{ "mqtt": { "url": "mqtt://127.0.0.1", "topics": [] } }"#;
    assert!(AppConfig::from_json_str(text).is_err());
}

//! PUTVAL 命令构造

use domain::TelemetryValue;

/// 构造 collectd PUTVAL 命令（不含换行）。
///
/// `collect_timestamp_secs` 缺省时使用 `N`，由 collectd 取当前时间。
/// 不对引号做转义。
pub fn build_putval(
    host: &str,
    plugin: &str,
    instance: &str,
    type_name: &str,
    value: &TelemetryValue,
    collect_timestamp_secs: Option<i64>,
) -> String {
    let token = match collect_timestamp_secs {
        Some(secs) => secs.to_string(),
        None => "N".to_string(),
    };
    format!(
        "PUTVAL \"{}/{}-{}/{}\" {}:{}",
        host, plugin, instance, type_name, token, value
    )
}

/// 毫秒 → 秒，四舍五入（.5 向上）。
pub fn collect_timestamp_secs(timestamp_ms: f64) -> i64 {
    round_half_up(timestamp_ms / 1000.0)
}

/// 四舍五入到整数（.5 向上，负数同样向正方向）。
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_timestamp_token() {
        let cmd = build_putval(
            "localhost",
            "mqtt",
            "sensor_a",
            "outdoor",
            &TelemetryValue::Number(42.0),
            Some(1),
        );
        assert_eq!(cmd, "PUTVAL \"localhost/mqtt-sensor_a/outdoor\" 1:42");
    }

    #[test]
    fn missing_timestamp_uses_now_token() {
        let cmd = build_putval(
            "host",
            "my_plugin",
            "x",
            "state-switch",
            &TelemetryValue::Text("on".to_string()),
            None,
        );
        assert_eq!(cmd, "PUTVAL \"host/my_plugin-x/state-switch\" N:on");
    }

    #[test]
    fn empty_type_is_kept() {
        let cmd = build_putval("h", "p", "i", "", &TelemetryValue::Number(3.5), None);
        assert_eq!(cmd, "PUTVAL \"h/p-i/\" N:3.5");
    }

    #[test]
    fn timestamp_rounds_half_up() {
        assert_eq!(collect_timestamp_secs(1000.0), 1);
        assert_eq!(collect_timestamp_secs(1499.0), 1);
        assert_eq!(collect_timestamp_secs(1499.6), 1);
        assert_eq!(collect_timestamp_secs(1500.0), 2);
        assert_eq!(collect_timestamp_secs(1_700_000_000_123.0), 1_700_000_000);
        assert_eq!(collect_timestamp_secs(-1500.0), -1);
    }

    #[test]
    fn millis_round_half_up() {
        assert_eq!(round_half_up(1499.6), 1500);
        assert_eq!(round_half_up(1000.5), 1001);
        assert_eq!(round_half_up(1000.4), 1000);
    }
}

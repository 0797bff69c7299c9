//! 协议相关类型定义

use crate::error::ProtocolError;
use std::fmt;

/// topic 拆分结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecomposedIdentifier {
    /// collectd plugin instance（`-` 已替换为 `_`）
    pub instance: String,
    /// collectd type
    pub type_name: String,
}

/// 下游 socket 地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownstreamAddress {
    /// `host:port`
    Tcp(String),
    /// `unix:/path/to/socket`
    #[cfg(unix)]
    Unix(std::path::PathBuf),
}

impl DownstreamAddress {
    /// 解析 `host:port` 或 `unix:/path`。
    pub fn parse(address: &str) -> Result<Self, ProtocolError> {
        let address = address.trim();
        if let Some(path) = address.strip_prefix("unix:") {
            if path.is_empty() {
                return Err(ProtocolError::InvalidAddress(address.to_string()));
            }
            #[cfg(unix)]
            return Ok(Self::Unix(std::path::PathBuf::from(path)));
            #[cfg(not(unix))]
            return Err(ProtocolError::InvalidAddress(address.to_string()));
        }
        match address.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {
                Ok(Self::Tcp(address.to_string()))
            }
            _ => Err(ProtocolError::InvalidAddress(address.to_string())),
        }
    }
}

impl fmt::Display for DownstreamAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp(addr) => f.write_str(addr),
            #[cfg(unix)]
            Self::Unix(path) => write!(f, "unix:{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tcp_address() {
        assert_eq!(
            DownstreamAddress::parse("127.0.0.1:25826").unwrap(),
            DownstreamAddress::Tcp("127.0.0.1:25826".to_string())
        );
    }

    #[cfg(unix)]
    #[test]
    fn parse_unix_address() {
        let address = DownstreamAddress::parse("unix:/var/run/collectd-unixsock").unwrap();
        assert_eq!(address.to_string(), "unix:/var/run/collectd-unixsock");
    }

    #[test]
    fn reject_missing_port() {
        assert!(DownstreamAddress::parse("localhost").is_err());
        assert!(DownstreamAddress::parse("localhost:http").is_err());
        assert!(DownstreamAddress::parse("unix:").is_err());
    }
}

//! 协议错误类型定义

/// 协议通信错误
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// 连接错误
    #[error("connection error: {0}")]
    Connection(String),

    /// IO 错误
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 下游地址无法识别
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// 写入任务已退出
    #[error("channel closed")]
    ChannelClosed,
}

//! 下游 socket 写入
//!
//! 后台任务独占连接，调用方通过无界通道投递命令行，投递本身不阻塞。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let config = DownstreamConfig {
//!     address: DownstreamAddress::parse("unix:/var/run/collectd-unixsock")?,
//!     reconnect_interval_ms: 5000,
//! };
//! let (writer, _task) = DownstreamWriter::spawn(config);
//! writer.send_line("PUTVAL \"localhost/mqtt-a/temp\" N:21.5")?;
//! ```

use crate::error::ProtocolError;
use crate::types::DownstreamAddress;
use bridge_telemetry::{record_command_emit_failure, record_command_emitted};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// 下游写入配置
#[derive(Debug, Clone)]
pub struct DownstreamConfig {
    pub address: DownstreamAddress,
    /// 重连间隔（毫秒）
    pub reconnect_interval_ms: u64,
}

/// 下游写入句柄（可克隆）
#[derive(Debug, Clone)]
pub struct DownstreamWriter {
    tx: mpsc::UnboundedSender<String>,
}

impl DownstreamWriter {
    /// 启动后台写入任务。
    pub fn spawn(config: DownstreamConfig) -> (Self, tokio::task::JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(config, rx));
        (Self { tx }, handle)
    }

    /// 投递一行命令（自动追加换行）。
    pub fn send_line(&self, line: &str) -> Result<(), ProtocolError> {
        self.tx
            .send(format!("{}\n", line))
            .map_err(|_| ProtocolError::ChannelClosed)
    }
}

/// 连接循环：断线后按间隔重连；所有句柄释放后退出。
async fn run(config: DownstreamConfig, mut rx: mpsc::UnboundedReceiver<String>) {
    loop {
        info!(target: "bridge.downstream", address = %config.address, "connecting");
        match connect_and_serve(&config.address, &mut rx).await {
            Ok(()) => {
                info!(target: "bridge.downstream", "all writers dropped, stopping");
                return;
            }
            Err(err) => {
                warn!(target: "bridge.downstream", address = %config.address, error = %err, "downstream_connection_failed");
            }
        }

        debug!(
            target: "bridge.downstream",
            "reconnecting in {}ms",
            config.reconnect_interval_ms
        );
        tokio::time::sleep(Duration::from_millis(config.reconnect_interval_ms)).await;
    }
}

async fn connect_and_serve(
    address: &DownstreamAddress,
    rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ProtocolError> {
    match address {
        DownstreamAddress::Tcp(addr) => {
            let stream = TcpStream::connect(addr).await?;
            info!(target: "bridge.downstream", address = %addr, "connected");
            serve(stream, rx).await
        }
        #[cfg(unix)]
        DownstreamAddress::Unix(path) => {
            let stream = tokio::net::UnixStream::connect(path).await?;
            info!(target: "bridge.downstream", address = %path.display(), "connected");
            serve(stream, rx).await
        }
    }
}

/// 写出排队的命令，同时读取并记录 collectd 的应答。
///
/// 排队的命令优先于应答处理。写失败的那一行直接丢弃，不重试。
async fn serve<S>(stream: S, rx: &mut mpsc::UnboundedReceiver<String>) -> Result<(), ProtocolError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut replies = BufReader::new(reader).lines();

    loop {
        tokio::select! {
            biased;
            line = rx.recv() => {
                let Some(line) = line else {
                    return Ok(());
                };
                let written = match writer.write_all(line.as_bytes()).await {
                    Ok(()) => writer.flush().await,
                    Err(err) => Err(err),
                };
                if let Err(err) = written {
                    record_command_emit_failure();
                    warn!(target: "bridge.downstream", command = %line.trim_end(), error = %err, "downstream_write_failed");
                    return Err(ProtocolError::Io(err));
                }
                record_command_emitted();
            }
            reply = replies.next_line() => {
                match reply? {
                    Some(reply) => debug!(target: "bridge.downstream", reply = %reply, "downstream_reply"),
                    None => return Err(ProtocolError::Connection("connection closed".to_string())),
                }
            }
        }
    }
}

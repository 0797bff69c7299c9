//! # Bridge Storage 模块
//!
//! topic 最新值缓存。
//!
//! - 写入只来自接入流水线（每条成功解析的消息覆盖一次）；
//! - 读取只来自 `/status` 查询（整体快照）；
//! - 无淘汰、无容量上限、无 TTL，进程重启即丢失。
//!
//! 每次写入是单个 insert，锁中毒后直接恢复使用。

pub mod in_memory;
pub mod traits;

pub use in_memory::StatusCache;
pub use traits::StatusStore;

//! 存储接口 Trait 定义

use domain::StatusEntry;
use std::collections::HashMap;

/// 最新值存储接口。
pub trait StatusStore: Send + Sync {
    /// 覆盖写入 topic 的最新值。
    fn set(&self, topic: &str, entry: StatusEntry);

    /// 当前全部条目的快照。
    fn snapshot(&self) -> HashMap<String, StatusEntry>;
}

//! 最新值内存缓存

use crate::traits::StatusStore;
use domain::StatusEntry;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// topic → 最新值
#[derive(Debug, Default)]
pub struct StatusCache {
    entries: RwLock<HashMap<String, StatusEntry>>,
}

impl StatusCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 条目数量
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, topic: &str) -> Option<StatusEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(topic)
            .cloned()
    }
}

impl StatusStore for StatusCache {
    fn set(&self, topic: &str, entry: StatusEntry) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        entries.insert(topic.to_string(), entry);
    }

    fn snapshot(&self) -> HashMap<String, StatusEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

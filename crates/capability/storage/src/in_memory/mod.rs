//! 内存存储实现

mod status;

pub use status::StatusCache;

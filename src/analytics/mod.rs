//! Scan statistics
//!
//! 统计完全在读取时计算：每次查看都全量读取该链接的扫码记录再聚合，
//! 不做缓存也不分页。日志量增大后这里是首个扩展瓶颈。

pub mod device;
pub mod stats;

pub use device::{DeviceClass, classify_user_agent};
pub use stats::{LinkStats, UNKNOWN_LABEL, aggregate};

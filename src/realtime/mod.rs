//! Realtime scan notifications
//!
//! 每次扫码日志写入成功后广播给所有在线的后台会话。投递语义为至多一次：
//! 没有订阅者时直接丢弃，落后的订阅者丢失被覆盖的事件，重连不补发。

mod notifier;

pub use notifier::{ScanNotifier, ScanSubscription};

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use crate::storage::ScanLog;

/// 扫码事件广播器
#[derive(Clone)]
pub struct ScanNotifier {
    sender: broadcast::Sender<Arc<ScanLog>>,
}

impl ScanNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// 发布新写入的扫码记录，返回收到事件的订阅者数量
    pub fn publish(&self, scan: ScanLog) -> usize {
        let link_id = scan.link_id;
        match self.sender.send(Arc::new(scan)) {
            Ok(receivers) => {
                debug!("Scan for link {} delivered to {} subscribers", link_id, receivers);
                receivers
            }
            // 没有订阅者
            Err(_) => 0,
        }
    }

    pub fn subscribe(&self) -> ScanSubscription {
        ScanSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// 单个订阅，drop 即取消订阅
pub struct ScanSubscription {
    receiver: broadcast::Receiver<Arc<ScanLog>>,
}

impl ScanSubscription {
    /// 等待下一条事件；通道关闭时返回 None
    pub async fn next(&mut self) -> Option<Arc<ScanLog>> {
        loop {
            match self.receiver.recv().await {
                Ok(scan) => return Some(scan),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Scan subscriber lagged, {} events dropped", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

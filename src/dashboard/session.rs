use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::analytics::LinkStats;
use crate::realtime::{ScanNotifier, ScanSubscription};

/// 一行计数器的视图状态
#[derive(Debug, Clone, Copy)]
pub struct RowCounter {
    pub count: u64,
    pub highlighted_until: Option<Instant>,
}

/// 推送给浏览器的计数变化
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterUpdate {
    pub link_id: i64,
    pub count: u64,
}

/// 各会话当前打开的统计图，按会话 id 登记，会话拆除时移除
pub type ChartSlots = Arc<DashMap<Uuid, Option<LinkStats>>>;

/// 正在运行的订阅：消费任务和它的停止信号
struct ActiveSubscription {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// 单个后台页面会话的上下文
///
/// 持有计数器视图、当前打开的统计图和至多一个实时订阅。
/// 重新订阅前总是先拆除旧订阅，同一事件不会被计数两次。
pub struct DashboardSession {
    id: Uuid,
    counters: Arc<DashMap<i64, RowCounter>>,
    charts: ChartSlots,
    highlight: Duration,
    updates: mpsc::Sender<CounterUpdate>,
    subscription: Option<ActiveSubscription>,
}

impl DashboardSession {
    /// 创建会话并登记统计图槽位，返回计数更新的接收端
    pub fn new(
        highlight: Duration,
        buffer: usize,
        charts: ChartSlots,
    ) -> (Self, mpsc::Receiver<CounterUpdate>) {
        let (updates, rx) = mpsc::channel(buffer.max(1));
        let id = Uuid::new_v4();
        charts.insert(id, None);
        let session = Self {
            id,
            counters: Arc::new(DashMap::new()),
            charts,
            highlight,
            updates,
            subscription: None,
        };
        (session, rx)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 登记已渲染的行及其初始计数
    pub fn render_rows<I>(&self, rows: I)
    where
        I: IntoIterator<Item = (i64, u64)>,
    {
        for (link_id, count) in rows {
            self.counters.insert(
                link_id,
                RowCounter {
                    count,
                    highlighted_until: None,
                },
            );
        }
    }

    pub fn count(&self, link_id: i64) -> Option<u64> {
        self.counters.get(&link_id).map(|row| row.count)
    }

    pub fn is_highlighted(&self, link_id: i64) -> bool {
        self.counters
            .get(&link_id)
            .and_then(|row| row.highlighted_until)
            .is_some_and(|until| until > Instant::now())
    }

    pub fn row_count(&self) -> usize {
        self.counters.len()
    }

    pub fn show_chart(&self, stats: LinkStats) {
        self.charts.insert(self.id, Some(stats));
    }

    pub fn chart(&self) -> Option<LinkStats> {
        self.charts.get(&self.id).and_then(|slot| slot.value().clone())
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// 订阅扫码事件，已有订阅会先被拆除
    pub async fn subscribe(&mut self, notifier: &ScanNotifier) {
        self.unsubscribe().await;

        let subscription = notifier.subscribe();
        let (shutdown, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(consume(
            subscription,
            shutdown_rx,
            Arc::clone(&self.counters),
            self.updates.clone(),
            self.highlight,
        ));

        self.subscription = Some(ActiveSubscription { shutdown, task });
        debug!("Dashboard session {} subscribed to scan events", self.id);
    }

    /// 停止消费任务并等待其退出，确保旧订阅已释放
    pub async fn unsubscribe(&mut self) {
        if let Some(active) = self.subscription.take() {
            let _ = active.shutdown.send(());
            let _ = active.task.await;
            debug!("Dashboard session {} unsubscribed", self.id);
        }
    }

    /// 拆除会话：取消订阅，清空计数器和统计图
    pub async fn teardown(&mut self) {
        self.unsubscribe().await;
        self.counters.clear();
        self.charts.remove(&self.id);
    }
}

impl Drop for DashboardSession {
    fn drop(&mut self) {
        self.charts.remove(&self.id);
        if let Some(active) = self.subscription.take() {
            let _ = active.shutdown.send(());
            active.task.abort();
        }
    }
}

async fn consume(
    mut subscription: ScanSubscription,
    mut shutdown: oneshot::Receiver<()>,
    counters: Arc<DashMap<i64, RowCounter>>,
    updates: mpsc::Sender<CounterUpdate>,
    highlight: Duration,
) {
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            event = subscription.next() => {
                let Some(scan) = event else { break };
                apply_scan(&counters, &updates, scan.link_id, highlight);
            }
        }
    }
}

/// 对应行存在时计数加一并高亮，否则丢弃
fn apply_scan(
    counters: &DashMap<i64, RowCounter>,
    updates: &mpsc::Sender<CounterUpdate>,
    link_id: i64,
    highlight: Duration,
) {
    let count = match counters.get_mut(&link_id) {
        Some(mut row) => {
            row.count += 1;
            row.highlighted_until = Some(Instant::now() + highlight);
            row.count
        }
        None => {
            trace!("No rendered row for link {}, scan dropped", link_id);
            return;
        }
    };

    if updates.try_send(CounterUpdate { link_id, count }).is_err() {
        trace!("Counter update for link {} not delivered", link_id);
    }
}

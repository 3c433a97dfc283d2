use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use super::session::{ChartSlots, CounterUpdate, DashboardSession};
use crate::errors::{QrlinkError, Result};
use crate::realtime::ScanNotifier;
use crate::services::{CreateLinkRequest, LinkService, StatsService, UpdateLinkRequest};

/// 后台页面可触发的一个动作
#[async_trait]
pub trait DashboardAction: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, payload: Value, admin_id: Option<String>) -> Result<Value>;
}

/// 按动作名分发的表
#[derive(Default)]
pub struct ActionTable {
    actions: BTreeMap<&'static str, Box<dyn DashboardAction>>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<A: DashboardAction + 'static>(&mut self, action: A) {
        let name = action.name();
        if self.actions.insert(name, Box::new(action)).is_some() {
            debug!("Dashboard action '{}' replaced", name);
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.actions.keys().copied().collect()
    }

    pub async fn dispatch(
        &self,
        name: &str,
        payload: Value,
        admin_id: Option<String>,
    ) -> Result<Value> {
        let action = self
            .actions
            .get(name)
            .ok_or_else(|| QrlinkError::not_found(format!("Unknown action '{}'", name)))?;

        debug!("Dispatching dashboard action '{}'", name);
        action.run(payload, admin_id).await
    }
}

fn parse_payload<T: DeserializeOwned>(action: &str, payload: Value) -> Result<T> {
    serde_json::from_value(payload)
        .map_err(|e| QrlinkError::validation(format!("Invalid payload for '{}': {}", action, e)))
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(QrlinkError::from)
}

#[derive(Debug, Deserialize)]
struct LinkIdPayload {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct ViewStatsPayload {
    id: i64,
    /// 打开该统计图的会话，来自 SSE 的 ready 帧
    #[serde(default)]
    session: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateLinkPayload {
    id: i64,
    #[serde(flatten)]
    changes: UpdateLinkRequest,
}

struct ViewStats {
    stats: Arc<StatsService>,
    charts: ChartSlots,
}

impl ViewStats {
    fn session_id(raw: &str) -> Result<Uuid> {
        Uuid::parse_str(raw)
            .map_err(|_| QrlinkError::validation(format!("Invalid session id '{}'", raw)))
    }
}

#[async_trait]
impl DashboardAction for ViewStats {
    fn name(&self) -> &'static str {
        "view-stats"
    }

    async fn run(&self, payload: Value, _admin_id: Option<String>) -> Result<Value> {
        let ViewStatsPayload { id, session } = parse_payload(self.name(), payload)?;
        let session = session.as_deref().map(Self::session_id).transpose()?;

        let stats = self.stats.link_stats(id).await?;
        let value = to_value(&stats)?;

        // 替换该会话当前的统计图；会话已拆除则报 NotFound
        if let Some(session) = session {
            let mut slot = self.charts.get_mut(&session).ok_or_else(|| {
                QrlinkError::not_found(format!("Dashboard session {} not found", session))
            })?;
            *slot = Some(stats);
        }
        Ok(value)
    }
}

struct CreateLink(Arc<LinkService>);

#[async_trait]
impl DashboardAction for CreateLink {
    fn name(&self) -> &'static str {
        "create-link"
    }

    async fn run(&self, payload: Value, admin_id: Option<String>) -> Result<Value> {
        let mut req: CreateLinkRequest = parse_payload(self.name(), payload)?;
        req.admin_id = admin_id;
        to_value(&self.0.create_link(req).await?)
    }
}

struct UpdateLink(Arc<LinkService>);

#[async_trait]
impl DashboardAction for UpdateLink {
    fn name(&self) -> &'static str {
        "update-link"
    }

    async fn run(&self, payload: Value, _admin_id: Option<String>) -> Result<Value> {
        let UpdateLinkPayload { id, changes } = parse_payload(self.name(), payload)?;
        to_value(&self.0.update_link(id, changes).await?)
    }
}

struct DeleteLink(Arc<LinkService>);

#[async_trait]
impl DashboardAction for DeleteLink {
    fn name(&self) -> &'static str {
        "delete-link"
    }

    async fn run(&self, payload: Value, _admin_id: Option<String>) -> Result<Value> {
        let LinkIdPayload { id } = parse_payload(self.name(), payload)?;
        self.0.delete_link(id).await?;
        Ok(serde_json::json!({ "id": id, "deleted": true }))
    }
}

/// 后台视图控制器：持有动作表并创建会话
pub struct DashboardController {
    actions: ActionTable,
    links: Arc<LinkService>,
    notifier: ScanNotifier,
    charts: ChartSlots,
    highlight: Duration,
    buffer: usize,
}

impl DashboardController {
    pub fn new(
        links: Arc<LinkService>,
        stats: Arc<StatsService>,
        notifier: ScanNotifier,
        highlight: Duration,
        buffer: usize,
    ) -> Self {
        let charts: ChartSlots = Arc::new(DashMap::new());
        let mut actions = ActionTable::new();
        actions.register(ViewStats {
            stats,
            charts: Arc::clone(&charts),
        });
        actions.register(CreateLink(Arc::clone(&links)));
        actions.register(UpdateLink(Arc::clone(&links)));
        actions.register(DeleteLink(Arc::clone(&links)));

        Self {
            actions,
            links,
            notifier,
            charts,
            highlight,
            buffer,
        }
    }

    pub fn actions(&self) -> &ActionTable {
        &self.actions
    }

    pub async fn dispatch(&self, name: &str, payload: Value, admin_id: Option<String>) -> Result<Value> {
        self.actions.dispatch(name, payload, admin_id).await
    }

    /// 新会话：按当前链接列表渲染计数行，然后订阅实时事件
    pub async fn open_session(&self) -> Result<(DashboardSession, mpsc::Receiver<CounterUpdate>)> {
        let (mut session, updates) = DashboardSession::new(self.highlight, self.buffer, Arc::clone(&self.charts));

        let rows = self.links.list_links().await?;
        session.render_rows(rows.iter().map(|row| (row.link.id, row.scans)));
        session.subscribe(&self.notifier).await;

        info!(
            "Dashboard session {} opened with {} rows",
            session.id(),
            session.row_count()
        );
        Ok((session, updates))
    }
}

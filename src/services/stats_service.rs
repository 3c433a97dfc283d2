use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::analytics::{LinkStats, aggregate};
use crate::errors::{QrlinkError, Result};
use crate::storage::{LinkStore, ScanLogStore};

/// 按需计算单链接统计，每次都从全量扫码记录重新聚合
pub struct StatsService {
    links: Arc<dyn LinkStore>,
    scans: Arc<dyn ScanLogStore>,
}

impl StatsService {
    pub fn new(links: Arc<dyn LinkStore>, scans: Arc<dyn ScanLogStore>) -> Self {
        Self { links, scans }
    }

    pub async fn link_stats(&self, link_id: i64) -> Result<LinkStats> {
        if self.links.get_link(link_id).await?.is_none() {
            return Err(QrlinkError::not_found(format!("Link {} not found", link_id)));
        }

        let rows = self.scans.scans_for_link(link_id).await?;
        let stats = aggregate(&rows, Utc::now());

        debug!(
            "Stats for link {}: total={}, last_7_days={}",
            link_id, stats.total, stats.last_7_days
        );
        Ok(stats)
    }
}

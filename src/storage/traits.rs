//! Store seams used by the redirect pipeline
//!
//! The database is an external collaborator; everything above the storage
//! layer talks to it through these traits.

use std::collections::HashMap;

use async_trait::async_trait;

use super::models::{Link, LinkUpdate, NewLink, NewScanLog, ScanLog, ScanRow};
use crate::errors::Result;

#[async_trait]
pub trait LinkStore: Send + Sync {
    /// 按 slug 精确查询
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>>;

    async fn get_link(&self, id: i64) -> Result<Option<Link>>;

    async fn list_links(&self) -> Result<Vec<Link>>;

    /// slug 重复时返回 Conflict
    async fn create_link(&self, link: NewLink) -> Result<Link>;

    /// 不存在时返回 NotFound
    async fn update_link(&self, id: i64, update: LinkUpdate) -> Result<Link>;

    /// 不存在时返回 NotFound，扫码日志保留
    async fn delete_link(&self, id: i64) -> Result<()>;
}

#[async_trait]
pub trait ScanLogStore: Send + Sync {
    /// 单次插入，返回带 id 的记录
    async fn insert_scan(&self, scan: NewScanLog) -> Result<ScanLog>;

    /// 某链接的全部扫码记录，按 created_at 升序
    async fn scans_for_link(&self, link_id: i64) -> Result<Vec<ScanRow>>;

    /// 每个链接的扫码总数
    async fn count_by_link(&self) -> Result<HashMap<i64, u64>>;
}

//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, EntityTrait, FromQueryResult, QueryFilter, QueryOrder, QuerySelect};
use tracing::debug;

use super::converters::model_to_link;
use super::{SeaOrmStorage, retry};
use crate::errors::{QrlinkError, Result};
use crate::storage::models::{GeoInfo, Link, ScanRow};

use migration::entities::{link, scan_log};

/// 统计读取的投影行
#[derive(Debug, FromQueryResult)]
struct ScanRowResult {
    created_at: chrono::DateTime<chrono::Utc>,
    country: Option<String>,
    region: Option<String>,
    city: Option<String>,
    user_agent: Option<String>,
}

/// 按链接分组计数结果
#[derive(Debug, FromQueryResult)]
struct LinkCountResult {
    link_id: i64,
    count: i64,
}

impl SeaOrmStorage {
    pub async fn find_link_by_slug(&self, slug: &str) -> Result<Option<Link>> {
        let db = &self.db;
        let slug_owned = slug.to_string();

        let model = retry::with_retry(&format!("find_by_slug({})", slug), self.retry_config, || {
            let slug = slug_owned.clone();
            async move {
                link::Entity::find()
                    .filter(link::Column::Slug.eq(slug))
                    .one(db)
                    .await
            }
        })
        .await
        .map_err(|e| QrlinkError::database_operation(format!("查询链接失败: {}", e)))?;

        Ok(model.map(model_to_link))
    }

    pub async fn find_link_by_id(&self, id: i64) -> Result<Option<Link>> {
        let db = &self.db;

        let model = retry::with_retry(&format!("get_link({})", id), self.retry_config, || async {
            link::Entity::find_by_id(id).one(db).await
        })
        .await
        .map_err(|e| QrlinkError::database_operation(format!("查询链接失败: {}", e)))?;

        Ok(model.map(model_to_link))
    }

    /// 所有链接，最新创建的在前
    pub async fn load_all_links(&self) -> Result<Vec<Link>> {
        let models = link::Entity::find()
            .order_by_desc(link::Column::CreatedAt)
            .order_by_desc(link::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| QrlinkError::database_operation(format!("加载链接失败: {}", e)))?;

        debug!("Loaded {} links", models.len());
        Ok(models.into_iter().map(model_to_link).collect())
    }

    /// 全量读取某链接的扫码记录（升序，无分页）
    pub async fn load_scan_rows(&self, link_id: i64) -> Result<Vec<ScanRow>> {
        let db = &self.db;

        let rows = retry::with_retry(
            &format!("scans_for_link({})", link_id),
            self.retry_config,
            || async {
                scan_log::Entity::find()
                    .select_only()
                    .column(scan_log::Column::CreatedAt)
                    .column(scan_log::Column::Country)
                    .column(scan_log::Column::Region)
                    .column(scan_log::Column::City)
                    .column(scan_log::Column::UserAgent)
                    .filter(scan_log::Column::LinkId.eq(link_id))
                    .order_by_asc(scan_log::Column::CreatedAt)
                    .order_by_asc(scan_log::Column::Id)
                    .into_model::<ScanRowResult>()
                    .all(db)
                    .await
            },
        )
        .await
        .map_err(|e| QrlinkError::database_operation(format!("查询扫码记录失败: {}", e)))?;

        debug!("Loaded {} scan rows for link {}", rows.len(), link_id);

        Ok(rows
            .into_iter()
            .map(|r| ScanRow {
                created_at: r.created_at,
                geo: GeoInfo {
                    country: r.country,
                    region: r.region,
                    city: r.city,
                },
                user_agent: r.user_agent,
            })
            .collect())
    }

    pub async fn count_scans_by_link(&self) -> Result<HashMap<i64, u64>> {
        let rows = scan_log::Entity::find()
            .select_only()
            .column(scan_log::Column::LinkId)
            .column_as(scan_log::Column::Id.count(), "count")
            .group_by(scan_log::Column::LinkId)
            .into_model::<LinkCountResult>()
            .all(&self.db)
            .await
            .map_err(|e| QrlinkError::database_operation(format!("统计扫码数失败: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|r| (r.link_id, r.count.max(0) as u64))
            .collect())
    }
}

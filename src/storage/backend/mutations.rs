//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, IntoActiveModel, SqlErr};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{
    model_to_link, model_to_scan_log, new_link_to_active_model, new_scan_to_active_model,
};
use super::retry;
use crate::errors::{QrlinkError, Result};
use crate::storage::models::{Link, LinkUpdate, NewLink, NewScanLog, ScanLog};

use migration::entities::link;

/// 唯一约束冲突转换为 Conflict，其余为数据库错误
fn map_write_error(err: DbErr, slug: &str, action: &str) -> QrlinkError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return QrlinkError::conflict(format!("slug '{}' 已存在", slug));
    }
    QrlinkError::database_operation(format!("{}失败: {}", action, err))
}

impl SeaOrmStorage {
    pub async fn insert_link(&self, new_link: NewLink) -> Result<Link> {
        let model = new_link_to_active_model(&new_link, Utc::now())
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, &new_link.slug, "创建链接"))?;

        info!("Link created: {} -> {}", model.slug, model.destination);
        Ok(model_to_link(model))
    }

    pub async fn apply_link_update(&self, id: i64, update: LinkUpdate) -> Result<Link> {
        let existing = link::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| QrlinkError::database_operation(format!("查询链接失败: {}", e)))?
            .ok_or_else(|| QrlinkError::not_found(format!("链接不存在: {}", id)))?;

        let slug_for_error = update
            .slug
            .clone()
            .unwrap_or_else(|| existing.slug.clone());

        let mut active = existing.into_active_model();
        if let Some(slug) = update.slug {
            active.slug = sea_orm::ActiveValue::Set(slug);
        }
        if let Some(destination) = update.destination {
            active.destination = sea_orm::ActiveValue::Set(destination);
        }
        if let Some(description) = update.description {
            active.description = sea_orm::ActiveValue::Set(description);
        }
        active.updated_at = sea_orm::ActiveValue::Set(Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| map_write_error(e, &slug_for_error, "更新链接"))?;

        info!("Link updated: {} ({})", model.slug, model.id);
        Ok(model_to_link(model))
    }

    pub async fn remove_link(&self, id: i64) -> Result<()> {
        let db = &self.db;

        let result = retry::with_retry(&format!("delete_link({})", id), self.retry_config, || async {
            link::Entity::delete_by_id(id).exec(db).await
        })
        .await
        .map_err(|e| QrlinkError::database_operation(format!("删除链接失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(QrlinkError::not_found(format!("链接不存在: {}", id)));
        }

        info!("Link deleted: {}", id);
        Ok(())
    }

    /// 单次插入扫码日志
    pub async fn append_scan(&self, scan: NewScanLog) -> Result<ScanLog> {
        let model = new_scan_to_active_model(&scan)
            .insert(&self.db)
            .await
            .map_err(|e| QrlinkError::database_operation(format!("写入扫码日志失败: {}", e)))?;

        Ok(model_to_scan_log(model))
    }
}

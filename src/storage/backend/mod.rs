//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod connection;
mod converters;
mod mutations;
mod query;
pub mod retry;

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::{QrlinkError, Result};
use crate::storage::models::{
    Link, LinkUpdate, NewLink, NewScanLog, ScanLog, ScanRow, StorageConfig,
};
use crate::storage::traits::{LinkStore, ScanLogStore};

pub use connection::{connect_generic, connect_sqlite, run_migrations};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(QrlinkError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(config: &DatabaseConfig, backend_name: &str) -> Result<Self> {
        if config.database_url.is_empty() {
            return Err(QrlinkError::database_config("database_url 未设置"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(&config.database_url, config.pool_size).await?
        } else {
            connect_generic(&config.database_url, backend_name, config.pool_size).await?
        };

        run_migrations(&db).await?;

        info!("{} storage initialized", backend_name.to_uppercase());

        Ok(SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            retry_config: retry::RetryConfig::from(config),
        })
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn get_backend_name(&self) -> &str {
        &self.backend_name
    }

    pub fn get_backend_config(&self) -> StorageConfig {
        StorageConfig {
            storage_type: self.backend_name.clone(),
        }
    }

    /// 健康检查用的连通性探测
    pub async fn ping(&self) -> Result<()> {
        self.db
            .execute_unprepared("SELECT 1")
            .await
            .map(|_| ())
            .map_err(|e| QrlinkError::database_connection(format!("数据库不可用: {}", e)))
    }
}

#[async_trait]
impl LinkStore for SeaOrmStorage {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>> {
        self.find_link_by_slug(slug).await
    }

    async fn get_link(&self, id: i64) -> Result<Option<Link>> {
        self.find_link_by_id(id).await
    }

    async fn list_links(&self) -> Result<Vec<Link>> {
        self.load_all_links().await
    }

    async fn create_link(&self, link: NewLink) -> Result<Link> {
        self.insert_link(link).await
    }

    async fn update_link(&self, id: i64, update: LinkUpdate) -> Result<Link> {
        self.apply_link_update(id, update).await
    }

    async fn delete_link(&self, id: i64) -> Result<()> {
        self.remove_link(id).await
    }
}

#[async_trait]
impl ScanLogStore for SeaOrmStorage {
    async fn insert_scan(&self, scan: NewScanLog) -> Result<ScanLog> {
        self.append_scan(scan).await
    }

    async fn scans_for_link(&self, link_id: i64) -> Result<Vec<ScanRow>> {
        self.load_scan_rows(link_id).await
    }

    async fn count_by_link(&self) -> Result<HashMap<i64, u64>> {
        self.count_scans_by_link().await
    }
}

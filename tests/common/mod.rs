//! Shared test fixtures: an in-memory store with call counters and
//! switchable failures, standing in for the database.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use qrlink::config::StaticConfig;
use qrlink::errors::{QrlinkError, Result};
use qrlink::runtime::lifetime::startup::AppServices;
use qrlink::storage::{
    Link, LinkStore, LinkUpdate, NewLink, NewScanLog, ScanLog, ScanLogStore, ScanRow,
};

#[derive(Default)]
pub struct MemoryStore {
    links: Mutex<Vec<Link>>,
    scans: Mutex<Vec<ScanLog>>,
    next_id: AtomicI64,
    pub lookups: AtomicUsize,
    pub inserts: AtomicUsize,
    pub fail_lookup: AtomicBool,
    pub fail_insert: AtomicBool,
    /// 查询前人为延迟（毫秒），用于超时测试
    pub lookup_delay_ms: AtomicI64,
    /// 插入前人为延迟（毫秒）
    pub insert_delay_ms: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// 直接放入一条链接，不经过校验
    pub async fn seed(&self, slug: &str, destination: &str) -> Link {
        let now = Utc::now();
        let link = Link {
            id: self.next_id(),
            slug: slug.to_string(),
            destination: destination.to_string(),
            description: None,
            admin_id: None,
            created_at: now,
            updated_at: now,
        };
        self.links.lock().await.push(link.clone());
        link
    }

    pub async fn push_scan(&self, scan: NewScanLog) -> ScanLog {
        let scan = scan.into_scan_log(self.next_id());
        self.scans.lock().await.push(scan.clone());
        scan
    }

    pub async fn scans(&self) -> Vec<ScanLog> {
        self.scans.lock().await.clone()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        let delay = self.lookup_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        }
        if self.fail_lookup.load(Ordering::SeqCst) {
            return Err(QrlinkError::database_connection("store unavailable"));
        }

        Ok(self
            .links
            .lock()
            .await
            .iter()
            .find(|l| l.slug == slug)
            .cloned())
    }

    async fn get_link(&self, id: i64) -> Result<Option<Link>> {
        Ok(self.links.lock().await.iter().find(|l| l.id == id).cloned())
    }

    async fn list_links(&self) -> Result<Vec<Link>> {
        let mut links = self.links.lock().await.clone();
        links.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(links)
    }

    async fn create_link(&self, link: NewLink) -> Result<Link> {
        let mut links = self.links.lock().await;
        if links.iter().any(|l| l.slug == link.slug) {
            return Err(QrlinkError::conflict(format!("Slug '{}' already exists", link.slug)));
        }
        let now = Utc::now();
        let created = Link {
            id: self.next_id(),
            slug: link.slug,
            destination: link.destination,
            description: link.description,
            admin_id: link.admin_id,
            created_at: now,
            updated_at: now,
        };
        links.push(created.clone());
        Ok(created)
    }

    async fn update_link(&self, id: i64, update: LinkUpdate) -> Result<Link> {
        let mut links = self.links.lock().await;
        let link = links
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| QrlinkError::not_found(format!("Link {} not found", id)))?;

        if let Some(slug) = update.slug {
            link.slug = slug;
        }
        if let Some(destination) = update.destination {
            link.destination = destination;
        }
        if let Some(description) = update.description {
            link.description = description;
        }
        link.updated_at = Utc::now();
        Ok(link.clone())
    }

    async fn delete_link(&self, id: i64) -> Result<()> {
        let mut links = self.links.lock().await;
        let before = links.len();
        links.retain(|l| l.id != id);
        if links.len() == before {
            return Err(QrlinkError::not_found(format!("Link {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl ScanLogStore for MemoryStore {
    async fn insert_scan(&self, scan: NewScanLog) -> Result<ScanLog> {
        self.inserts.fetch_add(1, Ordering::SeqCst);

        let delay = self.insert_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        }
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(QrlinkError::database_operation("insert rejected"));
        }
        Ok(self.push_scan(scan).await)
    }

    async fn scans_for_link(&self, link_id: i64) -> Result<Vec<ScanRow>> {
        let mut rows: Vec<ScanLog> = self
            .scans
            .lock()
            .await
            .iter()
            .filter(|s| s.link_id == link_id)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.created_at);
        Ok(rows
            .into_iter()
            .map(|s| ScanRow {
                created_at: s.created_at,
                geo: s.geo,
                user_agent: s.user_agent,
            })
            .collect())
    }

    async fn count_by_link(&self) -> Result<HashMap<i64, u64>> {
        let mut counts = HashMap::new();
        for scan in self.scans.lock().await.iter() {
            *counts.entry(scan.link_id).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

pub fn test_config() -> StaticConfig {
    let mut config = StaticConfig::default();
    config.admin.token = "test-token".to_string();
    config.redirect.fallback_url = "https://example.com/fallback".to_string();
    config.redirect.lookup_timeout_ms = 200;
    config.scan_log.insert_timeout_ms = 200;
    config.realtime.keepalive_secs = 1;
    config
}

pub fn services_for(store: &Arc<MemoryStore>, config: &StaticConfig) -> AppServices {
    AppServices::build(store.clone(), store.clone(), config)
}

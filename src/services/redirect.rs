//! Redirect resolver
//!
//! Two phases: the link lookup decides the outcome, the scan log write runs
//! afterwards and its result is discarded. A failing lookup degrades to the
//! fallback URL instead of an error page.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, error, instrument};

use super::scan_logger::{ScanContext, ScanLogger};
use crate::config::RedirectConfig;
use crate::errors::{QrlinkError, Result};
use crate::storage::{Link, LinkStore};
use crate::utils::slug::{is_valid_slug, normalize_slug};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    Redirect { destination: String },
    InvalidSlug,
    NotFound,
    Fallback { url: String },
}

#[derive(Debug, Clone)]
pub struct RedirectSettings {
    pub fallback_url: String,
    pub lookup_timeout: Duration,
    /// false 时扫码日志在后台任务中写入
    pub await_scan_log: bool,
}

impl From<&RedirectConfig> for RedirectSettings {
    fn from(config: &RedirectConfig) -> Self {
        Self {
            fallback_url: config.fallback_url.clone(),
            lookup_timeout: Duration::from_millis(config.lookup_timeout_ms),
            await_scan_log: config.await_scan_log,
        }
    }
}

impl Default for RedirectSettings {
    fn default() -> Self {
        Self::from(&RedirectConfig::default())
    }
}

pub struct RedirectResolver {
    links: Arc<dyn LinkStore>,
    logger: Arc<ScanLogger>,
    settings: RedirectSettings,
}

impl RedirectResolver {
    pub fn new(links: Arc<dyn LinkStore>, logger: Arc<ScanLogger>, settings: RedirectSettings) -> Self {
        Self {
            links,
            logger,
            settings,
        }
    }

    pub fn settings(&self) -> &RedirectSettings {
        &self.settings
    }

    /// 完整扫码：解析后写扫码日志
    #[instrument(skip(self, ctx), fields(slug = %slug))]
    pub async fn resolve(&self, slug: &str, ctx: ScanContext) -> RedirectOutcome {
        match self.find_target(slug).await {
            Ok(link) => {
                self.log_scan(link.id, ctx).await;
                RedirectOutcome::Redirect {
                    destination: link.destination,
                }
            }
            Err(outcome) => outcome,
        }
    }

    /// 只做第一阶段，不写扫码日志（HEAD 请求）
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn preview(&self, slug: &str) -> RedirectOutcome {
        match self.find_target(slug).await {
            Ok(link) => RedirectOutcome::Redirect {
                destination: link.destination,
            },
            Err(outcome) => outcome,
        }
    }

    /// 校验 slug 并查到可用链接，否则返回对应的非重定向结果
    async fn find_target(&self, slug: &str) -> std::result::Result<Link, RedirectOutcome> {
        if !is_valid_slug(slug) {
            debug!("Rejected malformed slug");
            return Err(RedirectOutcome::InvalidSlug);
        }

        match self.lookup(&normalize_slug(slug)).await {
            Ok(Some(link)) => Ok(link),
            Ok(None) => {
                debug!("No active link for slug");
                Err(RedirectOutcome::NotFound)
            }
            Err(e) => {
                error!("Link lookup failed, using fallback: {}", e);
                Err(RedirectOutcome::Fallback {
                    url: self.settings.fallback_url.clone(),
                })
            }
        }
    }

    /// 第一阶段：带超时的链接查询，超时映射为 `QrlinkError::Timeout`
    async fn lookup(&self, slug: &str) -> Result<Option<Link>> {
        let link = timeout(self.settings.lookup_timeout, self.links.find_by_slug(slug))
            .await
            .map_err(|_| {
                QrlinkError::timeout(format!(
                    "Link lookup for '{}' timed out after {:?}",
                    slug, self.settings.lookup_timeout
                ))
            })??;
        Ok(link.filter(Link::is_active))
    }

    /// 第二阶段：写扫码日志，结果丢弃
    async fn log_scan(&self, link_id: i64, ctx: ScanContext) {
        if self.settings.await_scan_log {
            let _ = self.logger.record(link_id, &ctx).await;
        } else {
            let logger = Arc::clone(&self.logger);
            tokio::spawn(async move {
                let _ = logger.record(link_id, &ctx).await;
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::realtime::ScanNotifier;
    use crate::storage::{LinkUpdate, NewLink, NewScanLog, ScanLog, ScanLogStore, ScanRow};

    /// 只有一条 `promo` 链接的桩存储
    struct StubStore {
        lookup_delay: Duration,
        inserts: AtomicUsize,
    }

    impl StubStore {
        fn new(lookup_delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                lookup_delay,
                inserts: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LinkStore for StubStore {
        async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>> {
            tokio::time::sleep(self.lookup_delay).await;
            let now = Utc::now();
            Ok((slug == "promo").then(|| Link {
                id: 1,
                slug: slug.to_string(),
                destination: "https://example.com/promo".to_string(),
                description: None,
                admin_id: None,
                created_at: now,
                updated_at: now,
            }))
        }

        async fn get_link(&self, _id: i64) -> Result<Option<Link>> {
            Ok(None)
        }

        async fn list_links(&self) -> Result<Vec<Link>> {
            Ok(Vec::new())
        }

        async fn create_link(&self, _link: NewLink) -> Result<Link> {
            Err(QrlinkError::validation("read-only"))
        }

        async fn update_link(&self, _id: i64, _update: LinkUpdate) -> Result<Link> {
            Err(QrlinkError::validation("read-only"))
        }

        async fn delete_link(&self, _id: i64) -> Result<()> {
            Err(QrlinkError::validation("read-only"))
        }
    }

    #[async_trait]
    impl ScanLogStore for StubStore {
        async fn insert_scan(&self, scan: NewScanLog) -> Result<ScanLog> {
            let id = self.inserts.fetch_add(1, Ordering::SeqCst) as i64 + 1;
            Ok(scan.into_scan_log(id))
        }

        async fn scans_for_link(&self, _link_id: i64) -> Result<Vec<ScanRow>> {
            Ok(Vec::new())
        }

        async fn count_by_link(&self) -> Result<HashMap<i64, u64>> {
            Ok(HashMap::new())
        }
    }

    fn resolver(store: &Arc<StubStore>) -> RedirectResolver {
        let logger = ScanLogger::new(store.clone(), ScanNotifier::new(8), Duration::from_millis(200));
        let settings = RedirectSettings {
            fallback_url: "/".to_string(),
            lookup_timeout: Duration::from_millis(50),
            await_scan_log: true,
        };
        RedirectResolver::new(store.clone(), Arc::new(logger), settings)
    }

    #[tokio::test]
    async fn test_lookup_timeout_is_typed() {
        let store = StubStore::new(Duration::from_millis(500));
        let err = resolver(&store).lookup("promo").await.unwrap_err();
        assert!(matches!(err, QrlinkError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_lookup_timeout_falls_back() {
        let store = StubStore::new(Duration::from_millis(500));
        let outcome = resolver(&store).resolve("promo", ScanContext::default()).await;
        assert_eq!(outcome, RedirectOutcome::Fallback { url: "/".to_string() });
        assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_preview_skips_scan_log() {
        let store = StubStore::new(Duration::ZERO);
        let resolver = resolver(&store);

        let outcome = resolver.preview("PROMO").await;
        assert_eq!(
            outcome,
            RedirectOutcome::Redirect {
                destination: "https://example.com/promo".to_string()
            }
        );
        assert_eq!(store.inserts.load(Ordering::SeqCst), 0);

        resolver.resolve("promo", ScanContext::default()).await;
        assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
    }
}

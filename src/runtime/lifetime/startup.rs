use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::dashboard::DashboardController;
use crate::realtime::ScanNotifier;
use crate::services::{LinkService, RedirectResolver, RedirectSettings, ScanLogger, StatsService};
use crate::storage::{LinkStore, ScanLogStore, SeaOrmStorage, StorageFactory};

/// 扫码链路上的全部服务，按依赖顺序构建
#[derive(Clone)]
pub struct AppServices {
    pub notifier: ScanNotifier,
    pub resolver: Arc<RedirectResolver>,
    pub links: Arc<LinkService>,
    pub stats: Arc<StatsService>,
    pub dashboard: Arc<DashboardController>,
}

impl AppServices {
    /// 用任意存储实现组装服务（测试中传入内存假实现）
    pub fn build(
        links: Arc<dyn LinkStore>,
        scans: Arc<dyn ScanLogStore>,
        config: &StaticConfig,
    ) -> Self {
        let notifier = ScanNotifier::new(config.realtime.channel_capacity);

        let logger = Arc::new(ScanLogger::new(
            Arc::clone(&scans),
            notifier.clone(),
            Duration::from_millis(config.scan_log.insert_timeout_ms),
        ));
        let resolver = Arc::new(RedirectResolver::new(
            Arc::clone(&links),
            logger,
            RedirectSettings::from(&config.redirect),
        ));

        let link_service = Arc::new(LinkService::new(Arc::clone(&links), Arc::clone(&scans)));
        let stats = Arc::new(StatsService::new(links, scans));
        let dashboard = Arc::new(DashboardController::new(
            Arc::clone(&link_service),
            Arc::clone(&stats),
            notifier.clone(),
            Duration::from_millis(config.realtime.highlight_ms),
            config.realtime.channel_capacity,
        ));

        Self {
            notifier,
            resolver,
            links: link_service,
            stats,
            dashboard,
        }
    }
}

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub services: AppServices,
}

/// 准备服务器启动的上下文：存储、迁移、服务
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create_with(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );

    let services = AppServices::build(storage.clone(), storage.clone(), config);

    if config.admin.token.is_empty() {
        info!("Admin API is disabled (admin.token is empty)");
    } else {
        info!("Admin API available at: {}", config.admin.route_prefix);
    }
    info!(
        "Scan redirects served at: {}/{{slug}}",
        config.redirect.route_prefix
    );

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext { storage, services })
}

//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use std::sync::Arc;
use std::time::Duration;

use actix_web::middleware::Compress;
use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::middleware::AdminToken;
use crate::api::services::admin::KeepAlive;
use crate::api::services::{AppStartTime, GeoHeaders, admin_config, health_routes, redirect_routes};
use crate::config::StaticConfig;
use crate::runtime::lifetime;
use crate::runtime::lifetime::startup::AppServices;

/// 路由与请求级设置，每个 worker 共享一份
#[derive(Clone, Debug)]
pub struct HttpSettings {
    pub redirect_prefix: String,
    pub admin_prefix: String,
    pub admin_token: String,
    pub keepalive: Duration,
    pub geo: GeoHeaders,
}

impl From<&StaticConfig> for HttpSettings {
    fn from(config: &StaticConfig) -> Self {
        Self {
            redirect_prefix: config.redirect.route_prefix.clone(),
            admin_prefix: config.admin.route_prefix.clone(),
            admin_token: config.admin.token.clone(),
            // interval 不接受 0
            keepalive: Duration::from_secs(config.realtime.keepalive_secs.max(1)),
            geo: GeoHeaders::from(&config.scan_log),
        }
    }
}

/// 注册服务数据、管理 API 和扫码入口
///
/// 不含 `/health`，它依赖具体的数据库存储。
pub fn app_config(
    services: &AppServices,
    settings: &HttpSettings,
) -> impl FnOnce(&mut web::ServiceConfig) + use<> {
    let services = services.clone();
    let settings = settings.clone();

    move |cfg| {
        cfg.app_data(web::Data::from(Arc::clone(&services.resolver)))
            .app_data(web::Data::from(Arc::clone(&services.links)))
            .app_data(web::Data::from(Arc::clone(&services.stats)))
            .app_data(web::Data::from(Arc::clone(&services.dashboard)))
            .app_data(web::Data::new(settings.geo.clone()))
            .app_data(web::Data::new(AdminToken(settings.admin_token.clone())))
            .app_data(web::Data::new(KeepAlive(settings.keepalive)))
            .app_data(web::PayloadConfig::new(1024 * 1024));

        admin_config(settings.admin_prefix.clone())(cfg);
        cfg.service(redirect_routes(&settings.redirect_prefix));
    }
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let startup = lifetime::startup::prepare_server_startup(config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {:#}", e))?;

    let storage = startup.storage.clone();
    let services = startup.services;
    let settings = HttpSettings::from(config);

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    // storage 移入闭包前保留一份连接用于关闭
    let db_for_shutdown = storage.get_db().clone();

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .service(health_routes())
            .configure(app_config(&services, &settings))
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .client_disconnect_timeout(Duration::from_millis(1000))
    .workers(cpu_count)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    info!("Starting server at http://{}", bind_address);

    tokio::select! {
        res = server => {
            res.context("HTTP server terminated with an error")?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&db_for_shutdown) => {
            warn!("Graceful shutdown completed");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_settings_from_config() {
        let mut config = StaticConfig::default();
        config.realtime.keepalive_secs = 0;
        config.scan_log.city_header = "CF-IPCity".into();

        let settings = HttpSettings::from(&config);
        assert_eq!(settings.redirect_prefix, "/qr");
        assert_eq!(settings.admin_prefix, "/admin");
        assert_eq!(settings.keepalive, Duration::from_secs(1));
        assert_eq!(settings.geo.city, "cf-ipcity");
    }
}

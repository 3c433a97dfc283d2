use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{error, trace};

use crate::api::services::admin::{ApiResponse, ErrorCode};
use crate::storage::SeaOrmStorage;

#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime: u64,
    pub storage: StorageHealth,
    pub response_time_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct StorageHealth {
    pub backend: String,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        storage: web::Data<Arc<SeaOrmStorage>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> HttpResponse {
        let started = Instant::now();
        trace!("Received health check request");

        let ping = tokio::time::timeout(Duration::from_secs(5), storage.ping()).await;
        let storage_error = match ping {
            Ok(Ok(())) => None,
            Ok(Err(e)) => {
                error!("Storage health check failed: {}", e);
                Some(e.message().to_string())
            }
            Err(_) => {
                error!("Storage health check timed out");
                Some("timeout".to_string())
            }
        };

        let healthy = storage_error.is_none();
        let now = chrono::Utc::now();
        let data = HealthResponse {
            status: if healthy { "healthy" } else { "unhealthy" },
            timestamp: now.to_rfc3339(),
            uptime: (now - app_start_time.start_datetime).num_seconds().max(0) as u64,
            storage: StorageHealth {
                backend: storage.get_backend_config().storage_type,
                healthy,
                error: storage_error,
            },
            response_time_ms: started.elapsed().as_millis() as u64,
        };

        let (status, code, message) = if healthy {
            (StatusCode::OK, ErrorCode::Success, "OK")
        } else {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                "Service Unavailable",
            )
        };

        HttpResponse::build(status).json(ApiResponse {
            code: code as i32,
            message: message.to_string(),
            data: Some(data),
        })
    }
}

pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
}

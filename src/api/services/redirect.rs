use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;
use tracing::trace;

use crate::config::ScanLogConfig;
use crate::services::{RedirectOutcome, RedirectResolver, ScanContext};
use crate::utils::ip::FORWARDED_FOR;

pub const INVALID_SLUG_MESSAGE: &str = "Formato de slug inválido.";
pub const NOT_FOUND_MESSAGE: &str = "QR Code não encontrado ou inativo.";

/// 平台注入的地理信息请求头名称
#[derive(Debug, Clone)]
pub struct GeoHeaders {
    pub country: String,
    pub region: String,
    pub city: String,
}

impl From<&ScanLogConfig> for GeoHeaders {
    fn from(config: &ScanLogConfig) -> Self {
        Self {
            country: config.country_header.to_ascii_lowercase(),
            region: config.region_header.to_ascii_lowercase(),
            city: config.city_header.to_ascii_lowercase(),
        }
    }
}

impl Default for GeoHeaders {
    fn default() -> Self {
        Self::from(&ScanLogConfig::default())
    }
}

fn header(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(String::from)
}

/// 一次性提取扫码上下文，之后不再接触 HttpRequest
pub fn scan_context(req: &HttpRequest, geo: &GeoHeaders) -> ScanContext {
    ScanContext {
        forwarded_for: header(req, FORWARDED_FOR),
        peer_ip: req.peer_addr().map(|addr| addr.ip().to_string()),
        user_agent: header(req, "user-agent"),
        accept_language: header(req, "accept-language"),
        country: header(req, &geo.country),
        region: header(req, &geo.region),
        city: header(req, &geo.city),
        query: req.uri().query().map(String::from),
    }
}

pub struct RedirectService;

impl RedirectService {
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        resolver: web::Data<RedirectResolver>,
        geo: web::Data<GeoHeaders>,
    ) -> HttpResponse {
        let slug = path.into_inner();
        let ctx = scan_context(&req, &geo);

        let outcome = resolver.resolve(&slug, ctx).await;
        Self::outcome_response(&slug, outcome)
    }

    /// HEAD 只回答重定向目标，不计为一次扫码
    pub async fn handle_head(
        path: web::Path<String>,
        resolver: web::Data<RedirectResolver>,
    ) -> HttpResponse {
        let slug = path.into_inner();
        let outcome = resolver.preview(&slug).await;
        Self::outcome_response(&slug, outcome)
    }

    fn outcome_response(slug: &str, outcome: RedirectOutcome) -> HttpResponse {
        match outcome {
            RedirectOutcome::Redirect { destination } => Self::redirect_response(&destination),
            RedirectOutcome::Fallback { url } => Self::redirect_response(&url),
            RedirectOutcome::InvalidSlug => {
                trace!("Invalid slug rejected: {}", slug);
                Self::invalid_slug_response()
            }
            RedirectOutcome::NotFound => Self::not_found_response(),
        }
    }

    #[inline]
    fn redirect_response(location: &str) -> HttpResponse {
        // 不缓存，保证每次扫码都经过服务端记录
        HttpResponse::build(StatusCode::TEMPORARY_REDIRECT)
            .insert_header(("Location", location))
            .insert_header(("Cache-Control", "no-store"))
            .finish()
    }

    #[inline]
    fn invalid_slug_response() -> HttpResponse {
        HttpResponse::BadRequest().json(json!({ "message": INVALID_SLUG_MESSAGE }))
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .insert_header(("Cache-Control", "no-store"))
            .body(NOT_FOUND_MESSAGE)
    }
}

pub fn redirect_routes(prefix: &str) -> actix_web::Scope {
    web::scope(prefix)
        .route("/{slug}", web::get().to(RedirectService::handle_redirect))
        .route("/{slug}", web::head().to(RedirectService::handle_head))
}

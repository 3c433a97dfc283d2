//! Admin API Bearer token 认证
//!
//! token 为空时整个管理 API 视为不存在（404）。比较使用常量时间。

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::Method;
use actix_web::middleware::Next;
use actix_web::{Error, HttpMessage, HttpResponse, web};
use subtle::ConstantTimeEq;
use tracing::{debug, info};

use crate::api::services::admin::{ApiResponse, ErrorCode};

/// 可选的管理员标识请求头，写入链接的 admin_id
pub const ADMIN_ID_HEADER: &str = "x-admin-id";
const DEFAULT_ADMIN_ID: &str = "admin";

/// 配置的管理 token
#[derive(Clone)]
pub struct AdminToken(pub String);

/// 认证通过后放入请求扩展
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity(pub String);

fn bearer_token(req: &ServiceRequest) -> Option<&[u8]> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.as_bytes().strip_prefix(b"Bearer "))
}

fn token_matches(given: &[u8], expected: &[u8]) -> bool {
    given.ct_eq(expected).into()
}

fn identity(req: &ServiceRequest) -> AdminIdentity {
    let id = req
        .headers()
        .get(ADMIN_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_ADMIN_ID);
    AdminIdentity(id.to_string())
}

pub async fn admin_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    if req.method() == Method::OPTIONS {
        return Ok(req.into_response(HttpResponse::NoContent().finish()));
    }

    let expected = req
        .app_data::<web::Data<AdminToken>>()
        .map(|t| t.0.clone())
        .unwrap_or_default();

    if expected.is_empty() {
        debug!("Admin token not configured - returning 404");
        return Ok(req.into_response(
            HttpResponse::NotFound()
                .insert_header(("Content-Type", "text/plain; charset=utf-8"))
                .body("Not Found"),
        ));
    }

    let authorized = bearer_token(&req).is_some_and(|given| token_matches(given, expected.as_bytes()));
    if authorized {
        let admin = identity(&req);
        req.extensions_mut().insert(admin);
        return next.call(req).await.map(ServiceResponse::map_into_boxed_body);
    }

    info!("Admin authentication failed - invalid or missing token");
    Ok(req.into_response(
        HttpResponse::Unauthorized()
            .insert_header(("Content-Type", "application/json; charset=utf-8"))
            .json(ApiResponse::<()> {
                code: ErrorCode::Unauthorized as i32,
                message: "Unauthorized: Invalid or missing token".to_string(),
                data: None,
            }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_matches() {
        assert!(token_matches(b"secret", b"secret"));
        assert!(!token_matches(b"secret", b"secreT"));
        assert!(!token_matches(b"sec", b"secret"));
        assert!(!token_matches(b"", b"secret"));
    }
}

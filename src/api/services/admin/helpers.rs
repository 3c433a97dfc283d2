//! Admin API 帮助函数

use actix_web::http::StatusCode;
use actix_web::{HttpMessage, HttpRequest, HttpResponse};
use serde::Serialize;
use tracing::error;

use crate::api::middleware::AdminIdentity;
use crate::errors::QrlinkError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(data))
}

pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 QrlinkError 构建错误响应，内部错误不回显细节
pub fn error_from_qrlink(err: &QrlinkError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        error!("Admin API error: {}", err);
        return error_response(status, ErrorCode::from(err), err.error_type());
    }
    error_response(status, ErrorCode::from(err), err.message())
}

/// 统一 Result → HttpResponse 转换
pub fn api_result<T: Serialize>(result: crate::errors::Result<T>) -> HttpResponse {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_qrlink(&e),
    }
}

/// 认证中间件写入的管理员标识
pub fn admin_id(req: &HttpRequest) -> Option<String> {
    req.extensions().get::<AdminIdentity>().map(|id| id.0.clone())
}

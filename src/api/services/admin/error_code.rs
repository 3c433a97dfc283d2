//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::QrlinkError;

/// API 错误码
///
/// 使用 serde_repr 序列化为数字，按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 链接错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    Timeout = 1006,
    ServiceUnavailable = 1030,

    // 链接错误 3000-3099
    LinkAlreadyExists = 3001,
}

impl From<&QrlinkError> for ErrorCode {
    fn from(err: &QrlinkError) -> Self {
        match err {
            QrlinkError::Validation(_) => ErrorCode::BadRequest,
            QrlinkError::NotFound(_) => ErrorCode::NotFound,
            QrlinkError::Conflict(_) => ErrorCode::LinkAlreadyExists,
            QrlinkError::Timeout(_) => ErrorCode::Timeout,
            QrlinkError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            _ => ErrorCode::InternalServerError,
        }
    }
}

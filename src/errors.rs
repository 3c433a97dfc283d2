use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum QrlinkError {
    Validation(String),
    NotFound(String),
    Conflict(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Timeout(String),
    Serialization(String),
    Config(String),
    FileOperation(String),
}

impl QrlinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            QrlinkError::Validation(_) => "E001",
            QrlinkError::NotFound(_) => "E002",
            QrlinkError::Conflict(_) => "E003",
            QrlinkError::DatabaseConfig(_) => "E004",
            QrlinkError::DatabaseConnection(_) => "E005",
            QrlinkError::DatabaseOperation(_) => "E006",
            QrlinkError::Timeout(_) => "E007",
            QrlinkError::Serialization(_) => "E008",
            QrlinkError::Config(_) => "E009",
            QrlinkError::FileOperation(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            QrlinkError::Validation(_) => "Validation Error",
            QrlinkError::NotFound(_) => "Resource Not Found",
            QrlinkError::Conflict(_) => "Resource Conflict",
            QrlinkError::DatabaseConfig(_) => "Database Configuration Error",
            QrlinkError::DatabaseConnection(_) => "Database Connection Error",
            QrlinkError::DatabaseOperation(_) => "Database Operation Error",
            QrlinkError::Timeout(_) => "Operation Timed Out",
            QrlinkError::Serialization(_) => "Serialization Error",
            QrlinkError::Config(_) => "Configuration Error",
            QrlinkError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            QrlinkError::Validation(msg)
            | QrlinkError::NotFound(msg)
            | QrlinkError::Conflict(msg)
            | QrlinkError::DatabaseConfig(msg)
            | QrlinkError::DatabaseConnection(msg)
            | QrlinkError::DatabaseOperation(msg)
            | QrlinkError::Timeout(msg)
            | QrlinkError::Serialization(msg)
            | QrlinkError::Config(msg)
            | QrlinkError::FileOperation(msg) => msg,
        }
    }

    /// 映射为 HTTP 状态码（Admin API 使用）
    pub fn http_status(&self) -> StatusCode {
        match self {
            QrlinkError::Validation(_) => StatusCode::BAD_REQUEST,
            QrlinkError::NotFound(_) => StatusCode::NOT_FOUND,
            QrlinkError::Conflict(_) => StatusCode::CONFLICT,
            QrlinkError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            QrlinkError::DatabaseConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for QrlinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for QrlinkError {}

// 便捷的构造函数
impl QrlinkError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        QrlinkError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        QrlinkError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        QrlinkError::Conflict(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        QrlinkError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        QrlinkError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        QrlinkError::DatabaseOperation(msg.into())
    }

    pub fn timeout<T: Into<String>>(msg: T) -> Self {
        QrlinkError::Timeout(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        QrlinkError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        QrlinkError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        QrlinkError::FileOperation(msg.into())
    }
}

impl From<sea_orm::DbErr> for QrlinkError {
    fn from(err: sea_orm::DbErr) -> Self {
        QrlinkError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for QrlinkError {
    fn from(err: std::io::Error) -> Self {
        QrlinkError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for QrlinkError {
    fn from(err: serde_json::Error) -> Self {
        QrlinkError::Serialization(err.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for QrlinkError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        QrlinkError::Timeout(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, QrlinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_unique() {
        let errors = [
            QrlinkError::validation("a"),
            QrlinkError::not_found("a"),
            QrlinkError::conflict("a"),
            QrlinkError::database_config("a"),
            QrlinkError::database_connection("a"),
            QrlinkError::database_operation("a"),
            QrlinkError::timeout("a"),
            QrlinkError::serialization("a"),
            QrlinkError::config("a"),
            QrlinkError::file_operation("a"),
        ];
        let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            QrlinkError::validation("bad").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            QrlinkError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            QrlinkError::conflict("dup").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            QrlinkError::database_operation("boom").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_format_simple() {
        let err = QrlinkError::not_found("link 42");
        assert_eq!(err.format_simple(), "Resource Not Found: link 42");
        assert_eq!(err.to_string(), err.format_simple());
    }
}

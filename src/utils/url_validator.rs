//! 目标地址校验：只允许 http/https，拒绝脚本类协议

use url::Url;

use crate::errors::{QrlinkError, Result};

const BLOCKED_SCHEMES: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

pub fn validate_destination(destination: &str) -> Result<()> {
    let destination = destination.trim();
    if destination.is_empty() {
        return Err(QrlinkError::validation("目标地址不能为空"));
    }

    let lower = destination.to_ascii_lowercase();
    if let Some(scheme) = BLOCKED_SCHEMES.iter().find(|s| lower.starts_with(**s)) {
        return Err(QrlinkError::validation(format!("不允许的协议: {}", scheme)));
    }

    let parsed = Url::parse(destination)
        .map_err(|e| QrlinkError::validation(format!("目标地址格式无效: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        "http" | "https" => Err(QrlinkError::validation("目标地址缺少主机名")),
        other => Err(QrlinkError::validation(format!(
            "仅支持 http:// 或 https://，收到 {}:",
            other
        ))),
    }
}

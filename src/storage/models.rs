use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 一个二维码对应的短链接
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    pub slug: String,
    pub destination: String,
    pub description: Option<String>,
    pub admin_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// 目标地址为空的链接视为未激活
    pub fn is_active(&self) -> bool {
        !self.destination.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub slug: String,
    pub destination: String,
    pub description: Option<String>,
    pub admin_id: Option<String>,
}

/// 部分更新，None 表示保持原值
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkUpdate {
    pub slug: Option<String>,
    pub destination: Option<String>,
    /// Some(None) 清空描述
    pub description: Option<Option<String>>,
}

/// 平台注入的粗粒度地理信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoInfo {
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
}

/// 已写入的扫码日志（不可变）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanLog {
    pub id: i64,
    pub link_id: i64,
    pub created_at: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub geo: GeoInfo,
    pub language: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
}

/// 待写入的扫码日志
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScanLog {
    pub link_id: i64,
    pub created_at: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub geo: GeoInfo,
    pub language: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
}

impl NewScanLog {
    pub fn into_scan_log(self, id: i64) -> ScanLog {
        ScanLog {
            id,
            link_id: self.link_id,
            created_at: self.created_at,
            ip: self.ip,
            user_agent: self.user_agent,
            geo: self.geo,
            language: self.language,
            utm_source: self.utm_source,
            utm_medium: self.utm_medium,
            utm_campaign: self.utm_campaign,
        }
    }
}

/// 统计读取使用的投影行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRow {
    pub created_at: DateTime<Utc>,
    pub geo: GeoInfo,
    pub user_agent: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StorageConfig {
    pub storage_type: String,
}

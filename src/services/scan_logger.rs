//! Scan logger
//!
//! Builds one analytics record per resolved scan and inserts it. Failures are
//! reported to the operator log and never propagate to the redirect.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::timeout;
use tracing::{debug, error};

use crate::realtime::ScanNotifier;
use crate::storage::{GeoInfo, NewScanLog, ScanLog, ScanLogStore};
use crate::utils::decode_non_empty;
use crate::utils::ip::resolve_client_ip;

/// 从请求中提取的原始字段，不依赖具体 HTTP 框架
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanContext {
    pub forwarded_for: Option<String>,
    pub peer_ip: Option<String>,
    pub user_agent: Option<String>,
    pub accept_language: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    /// 原始查询串（不含 `?`）
    pub query: Option<String>,
}

/// `scan_logs` 各列宽度，客户端提供的值写入前按字符截断
pub const IP_MAX_LEN: usize = 45;
pub const COUNTRY_MAX_LEN: usize = 64;
pub const REGION_MAX_LEN: usize = 128;
pub const CITY_MAX_LEN: usize = 128;
pub const LANGUAGE_MAX_LEN: usize = 64;
pub const UTM_MAX_LEN: usize = 255;

/// 截断到至多 `max` 个字符，不会切断多字节字符
fn clamp(value: Option<String>, max: usize) -> Option<String> {
    value.map(|v| match v.char_indices().nth(max) {
        Some((end, _)) => v[..end].to_string(),
        None => v,
    })
}

/// `Accept-Language` 的第一项，去掉 `;q=` 权重
fn primary_language(header: &str) -> Option<String> {
    header
        .split(',')
        .next()
        .and_then(|entry| entry.split(';').next())
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

/// 查询参数第一次出现的值，解码后为空视为缺失
fn query_param(query: Option<&str>, key: &str) -> Option<String> {
    let query = query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// 由请求上下文派生扫码记录
pub fn build_record(link_id: i64, ctx: &ScanContext, now: DateTime<Utc>) -> NewScanLog {
    let query = ctx.query.as_deref();

    NewScanLog {
        link_id,
        created_at: now,
        ip: clamp(
            resolve_client_ip(ctx.forwarded_for.as_deref(), ctx.peer_ip.as_deref()),
            IP_MAX_LEN,
        ),
        user_agent: non_empty(ctx.user_agent.as_deref()),
        geo: GeoInfo {
            country: clamp(ctx.country.as_deref().and_then(decode_non_empty), COUNTRY_MAX_LEN),
            region: clamp(ctx.region.as_deref().and_then(decode_non_empty), REGION_MAX_LEN),
            city: clamp(ctx.city.as_deref().and_then(decode_non_empty), CITY_MAX_LEN),
        },
        language: clamp(
            ctx.accept_language.as_deref().and_then(primary_language),
            LANGUAGE_MAX_LEN,
        ),
        utm_source: clamp(query_param(query, "utm_source"), UTM_MAX_LEN),
        utm_medium: clamp(query_param(query, "utm_medium"), UTM_MAX_LEN),
        utm_campaign: clamp(query_param(query, "utm_campaign"), UTM_MAX_LEN),
    }
}

pub struct ScanLogger {
    store: Arc<dyn ScanLogStore>,
    notifier: ScanNotifier,
    insert_timeout: Duration,
}

impl ScanLogger {
    pub fn new(store: Arc<dyn ScanLogStore>, notifier: ScanNotifier, insert_timeout: Duration) -> Self {
        Self {
            store,
            notifier,
            insert_timeout,
        }
    }

    /// 写入一条扫码日志并广播
    ///
    /// 失败或超时只记录错误日志并返回 None。
    pub async fn record(&self, link_id: i64, ctx: &ScanContext) -> Option<ScanLog> {
        let record = build_record(link_id, ctx, Utc::now());

        match timeout(self.insert_timeout, self.store.insert_scan(record)).await {
            Ok(Ok(scan)) => {
                debug!("Scan {} logged for link {}", scan.id, link_id);
                self.notifier.publish(scan.clone());
                Some(scan)
            }
            Ok(Err(e)) => {
                error!("Failed to log scan for link {}: {}", link_id, e);
                None
            }
            Err(_) => {
                error!(
                    "Scan log insert for link {} timed out after {:?}",
                    link_id, self.insert_timeout
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_full_context() {
        let ctx = ScanContext {
            forwarded_for: Some("203.0.113.9, 10.0.0.2".into()),
            peer_ip: Some("127.0.0.1".into()),
            user_agent: Some("Mozilla/5.0 (iPhone)".into()),
            accept_language: Some("pt-BR,pt;q=0.9,en;q=0.8".into()),
            country: Some("BR".into()),
            region: Some("SP".into()),
            city: Some("S%C3%A3o%20Paulo".into()),
            query: Some("utm_source=flyer&utm_medium=print&utm_campaign=spring%20sale".into()),
        };

        let record = build_record(42, &ctx, now());
        assert_eq!(record.link_id, 42);
        assert_eq!(record.created_at, now());
        assert_eq!(record.ip.as_deref(), Some("203.0.113.9"));
        assert_eq!(record.language.as_deref(), Some("pt-BR"));
        assert_eq!(record.geo.city.as_deref(), Some("São Paulo"));
        assert_eq!(record.geo.region.as_deref(), Some("SP"));
        assert_eq!(record.utm_medium.as_deref(), Some("print"));
        assert_eq!(record.utm_campaign.as_deref(), Some("spring sale"));
    }

    #[test]
    fn test_missing_fields_become_null() {
        let ctx = ScanContext {
            peer_ip: Some("192.0.2.1".into()),
            query: Some("utm_source=flyer&utm_medium=".into()),
            country: Some(String::new()),
            ..Default::default()
        };

        let record = build_record(1, &ctx, now());
        assert_eq!(record.ip.as_deref(), Some("192.0.2.1"));
        assert_eq!(record.utm_source.as_deref(), Some("flyer"));
        assert_eq!(record.utm_medium, None);
        assert_eq!(record.utm_campaign, None);
        assert_eq!(record.geo, GeoInfo::default());
        assert_eq!(record.language, None);
        assert_eq!(record.user_agent, None);
    }

    #[test]
    fn test_oversized_values_fit_columns() {
        let ctx = ScanContext {
            forwarded_for: Some(format!("{}, 10.0.0.1", "9".repeat(80))),
            accept_language: Some(format!("{};q=0.9", "x".repeat(100))),
            city: Some("ã".repeat(200)),
            query: Some(format!("utm_campaign={}&utm_source=flyer", "c".repeat(300))),
            ..Default::default()
        };

        let record = build_record(7, &ctx, now());
        assert_eq!(record.ip.map(|v| v.chars().count()), Some(IP_MAX_LEN));
        assert_eq!(record.language.map(|v| v.chars().count()), Some(LANGUAGE_MAX_LEN));
        assert_eq!(record.geo.city.as_deref(), Some("ã".repeat(CITY_MAX_LEN).as_str()));
        assert_eq!(record.utm_campaign.map(|v| v.len()), Some(UTM_MAX_LEN));
        assert_eq!(record.utm_source.as_deref(), Some("flyer"));
    }

    #[test]
    fn test_clamp_keeps_short_values() {
        assert_eq!(clamp(Some("BR".into()), COUNTRY_MAX_LEN).as_deref(), Some("BR"));
        assert_eq!(clamp(Some("abc".into()), 3).as_deref(), Some("abc"));
        assert_eq!(clamp(Some("abcd".into()), 3).as_deref(), Some("abc"));
        assert_eq!(clamp(None, 3), None);
    }

    #[test]
    fn test_primary_language() {
        assert_eq!(primary_language("en-US;q=0.8").as_deref(), Some("en-US"));
        assert_eq!(primary_language("*").as_deref(), Some("*"));
        assert_eq!(primary_language(""), None);
    }

    #[test]
    fn test_query_param_takes_first_occurrence() {
        assert_eq!(
            query_param(Some("utm_source=a&utm_source=b"), "utm_source").as_deref(),
            Some("a")
        );
        assert_eq!(
            query_param(Some("utm_source=news+letter"), "utm_source").as_deref(),
            Some("news letter")
        );
        assert_eq!(query_param(None, "utm_source"), None);
    }
}

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use super::device::classify_user_agent;
use crate::storage::ScanRow;

/// 国家缺失时的标签
pub const UNKNOWN_LABEL: &str = "Desconhecido";

/// 单个链接的聚合统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub total: u64,
    pub last_7_days: u64,
    /// 按次数降序，次数相同保持首次出现顺序
    pub countries: Vec<(String, u64)>,
    pub devices: Vec<(String, u64)>,
    /// UTC 日期（YYYY-MM-DD）升序
    pub daily: Vec<(String, u64)>,
}

/// 保持插入顺序的计数表
#[derive(Default)]
struct FrequencyTable {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl FrequencyTable {
    fn add(&mut self, label: &str) {
        match self.index.get(label) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push((label.to_string(), 1));
            }
        }
    }

    fn into_sorted(self) -> Vec<(String, u64)> {
        let mut entries = self.entries;
        // sort_by 是稳定排序
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

/// 聚合某链接的扫码记录
///
/// `rows` 应按 `created_at` 升序传入，平局顺序依赖这一点。
pub fn aggregate(rows: &[ScanRow], now: DateTime<Utc>) -> LinkStats {
    let window_start = now - Duration::days(7);

    let mut last_7_days = 0u64;
    let mut countries = FrequencyTable::default();
    let mut devices = FrequencyTable::default();
    let mut daily: BTreeMap<NaiveDate, u64> = BTreeMap::new();

    for row in rows {
        if row.created_at > window_start {
            last_7_days += 1;
        }

        let country = row
            .geo
            .country
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNKNOWN_LABEL);
        countries.add(country);

        devices.add(classify_user_agent(row.user_agent.as_deref()).label());

        *daily.entry(row.created_at.date_naive()).or_insert(0) += 1;
    }

    LinkStats {
        total: rows.len() as u64,
        last_7_days,
        countries: countries.into_sorted(),
        devices: devices.into_sorted(),
        daily: daily
            .into_iter()
            .map(|(day, count)| (day.format("%Y-%m-%d").to_string(), count))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::GeoInfo;
    use chrono::TimeZone;

    fn row(at: DateTime<Utc>, country: Option<&str>, ua: Option<&str>) -> ScanRow {
        ScanRow {
            created_at: at,
            geo: GeoInfo {
                country: country.map(str::to_string),
                ..Default::default()
            },
            user_agent: ua.map(str::to_string),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn pairs(v: &[(&str, u64)]) -> Vec<(String, u64)> {
        v.iter().map(|(l, c)| (l.to_string(), *c)).collect()
    }

    #[test]
    fn test_empty_input() {
        let stats = aggregate(&[], now());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.last_7_days, 0);
        assert!(stats.countries.is_empty());
        assert!(stats.devices.is_empty());
        assert!(stats.daily.is_empty());
    }

    #[test]
    fn test_country_ranking_keeps_first_seen_order_on_ties() {
        let t = now() - Duration::hours(1);
        let rows: Vec<ScanRow> = ["BR", "BR", "US", "BR", "FR"]
            .into_iter()
            .map(|c| row(t, Some(c), None))
            .collect();

        let stats = aggregate(&rows, now());
        assert_eq!(stats.countries, pairs(&[("BR", 3), ("US", 1), ("FR", 1)]));
    }

    #[test]
    fn test_missing_country_uses_unknown_label() {
        let t = now() - Duration::hours(1);
        let rows = vec![row(t, None, None), row(t, Some(""), None), row(t, Some("PT"), None)];

        let stats = aggregate(&rows, now());
        assert_eq!(stats.countries, pairs(&[(UNKNOWN_LABEL, 2), ("PT", 1)]));
        assert_eq!(stats.devices, pairs(&[("Desconhecido", 3)]));
    }

    #[test]
    fn test_device_table() {
        let t = now() - Duration::hours(1);
        let rows = vec![
            row(t, None, Some("Mozilla/5.0 (Linux; Android 13)")),
            row(t, None, Some("Mozilla/5.0 (X11; Linux x86_64)")),
            row(t, None, Some("Mozilla/5.0 (Linux; Android 14)")),
            row(t, None, Some("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)")),
        ];

        let stats = aggregate(&rows, now());
        assert_eq!(
            stats.devices,
            pairs(&[("Android", 2), ("Linux", 1), ("iOS", 1)])
        );
    }

    #[test]
    fn test_seven_day_window_is_exclusive() {
        let rows = vec![
            row(now() - Duration::days(10), None, None),
            row(now() - Duration::days(7), None, None),
            row(now() - Duration::days(7) + Duration::seconds(1), None, None),
            row(now(), None, None),
        ];

        let stats = aggregate(&rows, now());
        assert_eq!(stats.total, 4);
        assert_eq!(stats.last_7_days, 2);
    }

    #[test]
    fn test_daily_series_is_ascending_by_utc_date() {
        let rows = vec![
            row(Utc.with_ymd_and_hms(2024, 6, 13, 23, 59, 59).unwrap(), None, None),
            row(Utc.with_ymd_and_hms(2024, 6, 14, 0, 0, 0).unwrap(), None, None),
            row(Utc.with_ymd_and_hms(2024, 6, 14, 8, 30, 0).unwrap(), None, None),
        ];

        let stats = aggregate(&rows, now());
        assert_eq!(stats.daily, pairs(&[("2024-06-13", 1), ("2024-06-14", 2)]));
    }
}

use chrono::{DateTime, Utc};

use crate::storage::models::{GeoInfo, Link, NewLink, NewScanLog, ScanLog};
use migration::entities::{link, scan_log};

/// 将 Sea-ORM Model 转换为 Link
pub fn model_to_link(model: link::Model) -> Link {
    Link {
        id: model.id,
        slug: model.slug,
        destination: model.destination,
        description: model.description,
        admin_id: model.admin_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// NewLink -> ActiveModel，id 由数据库分配
pub fn new_link_to_active_model(link: &NewLink, now: DateTime<Utc>) -> link::ActiveModel {
    use sea_orm::ActiveValue::*;

    link::ActiveModel {
        id: NotSet,
        slug: Set(link.slug.clone()),
        destination: Set(link.destination.clone()),
        description: Set(link.description.clone()),
        admin_id: Set(link.admin_id.clone()),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

pub fn model_to_scan_log(model: scan_log::Model) -> ScanLog {
    ScanLog {
        id: model.id,
        link_id: model.link_id,
        created_at: model.created_at,
        ip: model.ip,
        user_agent: model.user_agent,
        geo: GeoInfo {
            country: model.country,
            region: model.region,
            city: model.city,
        },
        language: model.language,
        utm_source: model.utm_source,
        utm_medium: model.utm_medium,
        utm_campaign: model.utm_campaign,
    }
}

pub fn new_scan_to_active_model(scan: &NewScanLog) -> scan_log::ActiveModel {
    use sea_orm::ActiveValue::*;

    scan_log::ActiveModel {
        id: NotSet,
        link_id: Set(scan.link_id),
        created_at: Set(scan.created_at),
        ip: Set(scan.ip.clone()),
        user_agent: Set(scan.user_agent.clone()),
        country: Set(scan.geo.country.clone()),
        region: Set(scan.geo.region.clone()),
        city: Set(scan.geo.city.clone()),
        language: Set(scan.language.clone()),
        utm_source: Set(scan.utm_source.clone()),
        utm_medium: Set(scan.utm_medium.clone()),
        utm_campaign: Set(scan.utm_campaign.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    #[test]
    fn test_model_to_link() {
        let now = Utc::now();
        let link = model_to_link(link::Model {
            id: 7,
            slug: "promo-2024".to_string(),
            destination: "https://example.com/promo".to_string(),
            description: None,
            admin_id: Some("admin-1".to_string()),
            created_at: now,
            updated_at: now,
        });

        assert_eq!(link.id, 7);
        assert_eq!(link.slug, "promo-2024");
        assert_eq!(link.admin_id.as_deref(), Some("admin-1"));
        assert!(link.is_active());
    }

    #[test]
    fn test_new_link_leaves_id_unset() {
        let model = new_link_to_active_model(
            &NewLink {
                slug: "a".to_string(),
                destination: "https://a.example".to_string(),
                description: Some("flyer".to_string()),
                admin_id: None,
            },
            Utc::now(),
        );

        assert!(matches!(model.id, ActiveValue::NotSet));
        assert!(matches!(model.slug, ActiveValue::Set(ref s) if s == "a"));
    }

    #[test]
    fn test_scan_log_geo_is_nested() {
        let now = Utc::now();
        let scan = model_to_scan_log(scan_log::Model {
            id: 1,
            link_id: 3,
            created_at: now,
            ip: Some("203.0.113.9".to_string()),
            user_agent: None,
            country: Some("BR".to_string()),
            region: Some("SP".to_string()),
            city: None,
            language: Some("pt-BR".to_string()),
            utm_source: Some("flyer".to_string()),
            utm_medium: None,
            utm_campaign: None,
        });

        assert_eq!(scan.geo.country.as_deref(), Some("BR"));
        assert_eq!(scan.geo.region.as_deref(), Some("SP"));
        assert_eq!(scan.geo.city, None);
    }
}

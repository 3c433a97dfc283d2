//! Admin API 链接 CRUD 操作

use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{info, trace};

use crate::services::{CreateLinkRequest, LinkService, StatsService, UpdateLinkRequest};

use super::helpers::{admin_id, api_result, created_response, error_from_qrlink};
use super::types::DeleteResponse;

/// 所有链接（最新在前）及扫码总数
pub async fn get_all_links(links: web::Data<LinkService>) -> HttpResponse {
    trace!("Admin API: list links");
    api_result(links.list_links().await)
}

pub async fn get_link(path: web::Path<i64>, links: web::Data<LinkService>) -> HttpResponse {
    api_result(links.get_link(path.into_inner()).await)
}

pub async fn post_link(
    req: HttpRequest,
    body: web::Json<CreateLinkRequest>,
    links: web::Data<LinkService>,
) -> HttpResponse {
    let mut create = body.into_inner();
    create.admin_id = admin_id(&req);

    match links.create_link(create).await {
        Ok(link) => {
            info!("Admin API: created link '{}'", link.slug);
            created_response(link)
        }
        Err(e) => error_from_qrlink(&e),
    }
}

pub async fn update_link(
    path: web::Path<i64>,
    body: web::Json<UpdateLinkRequest>,
    links: web::Data<LinkService>,
) -> HttpResponse {
    api_result(links.update_link(path.into_inner(), body.into_inner()).await)
}

pub async fn delete_link(path: web::Path<i64>, links: web::Data<LinkService>) -> HttpResponse {
    let id = path.into_inner();
    api_result(
        links
            .delete_link(id)
            .await
            .map(|_| DeleteResponse { id, deleted: true }),
    )
}

/// 单链接统计，每次请求都全量重算
pub async fn get_link_stats(path: web::Path<i64>, stats: web::Data<StatsService>) -> HttpResponse {
    api_result(stats.link_stats(path.into_inner()).await)
}

//! Admin API 路由配置

use actix_web::web;

use super::actions::{list_actions, run_action};
use super::link_crud::{delete_link, get_all_links, get_link, get_link_stats, post_link, update_link};
use super::realtime::scan_stream;

/// 链接管理路由 `/links`
///
/// - GET/POST /links
/// - GET/PUT/DELETE /links/{id}
/// - GET /links/{id}/stats
pub fn links_routes() -> actix_web::Scope {
    web::scope("/links")
        .route("", web::get().to(get_all_links))
        .route("", web::post().to(post_link))
        .route("/{id}/stats", web::get().to(get_link_stats))
        .route("/{id}", web::get().to(get_link))
        .route("/{id}", web::put().to(update_link))
        .route("/{id}", web::delete().to(delete_link))
}

/// 后台动作 `/actions`
pub fn actions_routes() -> actix_web::Scope {
    web::scope("/actions")
        .route("", web::get().to(list_actions))
        .route("/{name}", web::post().to(run_action))
}

/// 实时推送 `/realtime`
pub fn realtime_routes() -> actix_web::Scope {
    web::scope("/realtime").route("/scans", web::get().to(scan_stream))
}

//! Admin API 服务模块
//!
//! 链接 CRUD、单链接统计、后台动作分发与实时扫码推送。
//! 所有端点都在 `admin.route_prefix` 下并经过 Bearer token 认证。

mod actions;
pub mod error_code;
mod helpers;
mod link_crud;
pub mod realtime;
pub mod routes;
mod types;

use actix_web::middleware::from_fn;
use actix_web::web;

pub use error_code::ErrorCode;
pub use helpers::{api_result, error_from_qrlink, error_response, success_response};
pub use realtime::KeepAlive;
pub use types::*;

use crate::api::middleware::admin_auth;

/// 在 `prefix` 下挂载完整管理 API
pub fn admin_config(prefix: String) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(
            web::scope(&prefix)
                .wrap(from_fn(admin_auth))
                .service(routes::links_routes())
                .service(routes::actions_routes())
                .service(routes::realtime_routes()),
        );
    }
}

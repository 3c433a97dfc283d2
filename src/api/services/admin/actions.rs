//! 后台动作分发端点 `POST /actions/{name}`

use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::Value;

use crate::dashboard::DashboardController;

use super::helpers::{admin_id, api_result};

pub async fn run_action(
    req: HttpRequest,
    path: web::Path<String>,
    body: Option<web::Json<Value>>,
    controller: web::Data<DashboardController>,
) -> HttpResponse {
    let payload = body.map(web::Json::into_inner).unwrap_or(Value::Null);
    api_result(
        controller
            .dispatch(&path.into_inner(), payload, admin_id(&req))
            .await,
    )
}

pub async fn list_actions(controller: web::Data<DashboardController>) -> HttpResponse {
    api_result(Ok(controller.actions().names()))
}

//! HTTP layer: redirect endpoint, admin API, health check

pub mod middleware;
pub mod services;

pub mod admin;
pub mod health;
pub mod redirect;

pub use admin::admin_config;
pub use health::{AppStartTime, HealthService, health_routes};
pub use redirect::{GeoHeaders, RedirectService, redirect_routes};

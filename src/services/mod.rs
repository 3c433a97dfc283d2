//! Service layer for business logic
//!
//! Everything here is transport-agnostic: the HTTP handlers, dashboard
//! actions and CLI commands all call into these services.

mod link_service;
pub mod redirect;
pub mod scan_logger;
mod stats_service;

pub use link_service::*;
pub use redirect::{RedirectOutcome, RedirectResolver, RedirectSettings};
pub use scan_logger::{ScanContext, ScanLogger};
pub use stats_service::StatsService;

//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

pub mod config_management;
mod link_management;
mod stats;

pub use link_management::*;
pub use stats::show_stats;

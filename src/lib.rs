//! qrlink - QR code redirects with scan analytics
//!
//! A scan of a printed QR code hits the redirect resolver, which looks up the
//! link, records one scan log and answers with a redirect. Every logged scan
//! is broadcast to open dashboard sessions; per-link statistics are computed
//! on demand from the full scan history.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line interface
//!
//! # Architecture
//! - `storage`: Link and scan log stores (sea-orm)
//! - `services`: Redirect resolver, scan logger, link CRUD, stats
//! - `realtime`: Scan event broadcast
//! - `dashboard`: Per-session counters and the admin action table
//! - `analytics`: Stats aggregation and device classification
//! - `api`: HTTP services and middleware
//! - `interfaces`: CLI commands
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod interfaces;
pub mod realtime;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;

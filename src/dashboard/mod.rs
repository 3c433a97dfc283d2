//! Admin dashboard view state
//!
//! `DashboardSession` is the per-connection context (counters, chart, realtime
//! subscription); `DashboardController` owns the action table and opens
//! sessions.

mod actions;
mod session;

pub use actions::{ActionTable, DashboardAction, DashboardController};
pub use session::{ChartSlots, CounterUpdate, DashboardSession, RowCounter};

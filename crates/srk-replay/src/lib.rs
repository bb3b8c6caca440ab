//! srk-replay
//!
//! Stock replay / reconciliation engine.
//!
//! Rules:
//! - Movements are applied strictly in stream order; sequence numbers must
//!   strictly decrease, a regression is recorded as a critical anomaly
//! - Parse failures and absent movements are critical
//! - Quantity mismatches on non-transfer events are recorded, never critical
//! - Critical is sticky for the lifetime of an engine
//! - Nothing is thrown: every anomaly is accumulated as an `ErrorEntry`
//!
//! The engine itself is pure state-machine logic. `replay_stream` is the thin
//! driver that feeds an iterator through it and logs anomalies.

mod driver;
mod engine;
mod filter;
mod history;
mod types;

pub use driver::replay_stream;
pub use engine::ReplayEngine;
pub use filter::{filter_lines, StockFilter};
pub use history::MovementHistory;
pub use types::*;

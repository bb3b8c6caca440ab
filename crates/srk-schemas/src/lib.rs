//! srk-schemas
//!
//! Value types shared by every stage of a stock replay:
//! - `StockLine`: one inventory position, keyed by its source sequence number
//! - `MovementEvent` / `MovementKind`: one parsed journal entry
//! - `ErrorEntry` / `ErrorKind`: the closed error taxonomy, recorded as data
//!
//! No IO. Parsing and formatting live in `srk-csv`; the replay state machine
//! lives in `srk-replay`.

mod columns;
mod error;
mod movement;
mod stock;

pub use columns::*;
pub use error::*;
pub use movement::*;
pub use stock::*;

/// Outcome of parsing one movement line: either a valid event or the
/// classified failure, in stream order.
pub type MovementResult = Result<MovementEvent, ErrorEntry>;

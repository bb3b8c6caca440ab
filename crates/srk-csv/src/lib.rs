//! srk-csv
//!
//! File boundary of a stock replay: parses the movement journal and the stock
//! snapshot exports, and writes the reconstructed stock plus the error log.
//!
//! Both exports are plain comma-separated text with a fixed column count
//! (22 for movements, 76 for stock) and an optional header row. Fields are
//! trimmed; empty values and underscore placeholders mean "absent".
//!
//! Every failure is an `ErrorEntry`. Parsing never panics on bad input.

pub mod fields;
mod movement;
mod stock;
mod stream;
mod writer;

pub use movement::{parse_movement_line, MOVEMENT_COLUMNS, MOVEMENT_FIELD_COUNT};
pub use stock::{
    load_stock_snapshot, parse_stock_line, read_stock_snapshot, stock_line_to_record,
    StockSnapshot,
};
pub use stream::{is_header_line, MovementStream};
pub use writer::{errors_file_name, stocks_file_name, write_results, WrittenFiles, ERRORS_HEADER};

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use srk_schemas::{col, ColumnType, ErrorEntry, StockLine, STOCK_COLUMNS, STOCK_COLUMN_COUNT};
use tracing::{info, warn};

use crate::fields::{date, decimal, format_opt, integer, normalize, required_integer, text};
use crate::stream::{is_header_field, strip_bom};

// Snapshots are read in the same RFC-4180 dialect the writer emits, so a
// written stocks file reloads as the next baseline unchanged. Field count is
// checked per line, not by the reader.
fn snapshot_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
}

/// Parse one 76-column snapshot line.
///
/// Typed fields land on `StockLine`; every other column is validated against
/// its declared type and kept as normalized text in `attributes`.
pub fn parse_stock_line(line: &str) -> Result<StockLine, ErrorEntry> {
    if line.trim().is_empty() {
        return Err(ErrorEntry::parse_error(line, "Stock line is empty"));
    }

    let record = snapshot_reader(line.as_bytes())
        .records()
        .next()
        .transpose()
        .map_err(|e| ErrorEntry::parse_error(line, format!("Malformed stock line: {e}")))?
        .unwrap_or_default();
    let fields: Vec<&str> = record.iter().collect();
    parse_stock_fields(&fields, line)
}

fn parse_stock_fields(f: &[&str], line: &str) -> Result<StockLine, ErrorEntry> {
    if f.len() != STOCK_COLUMN_COUNT {
        return Err(ErrorEntry::invalid_field_count(
            line,
            STOCK_COLUMN_COUNT,
            f.len(),
        ));
    }

    let name = |idx: usize| STOCK_COLUMNS[idx].name;

    let sequence = required_integer(line, name(col::SEQUENCE), f[col::SEQUENCE])?;
    let quantity = decimal(line, name(col::QUANTITY_ON_HAND), f[col::QUANTITY_ON_HAND])?;

    let mut out = StockLine::new(sequence, quantity.unwrap_or(Decimal::ZERO));
    out.item = text(f[col::ITEM_NUMBER]);
    out.client = integer(line, name(col::CLIENT), f[col::CLIENT])?;
    out.batch1 = text(f[col::BATCH1]);
    out.batch2 = text(f[col::BATCH2]);
    out.serial_number = text(f[col::SERIAL_NUMBER]);
    out.customer_order = text(f[col::CUSTOMER_ORDER]);
    out.customer_order_pos = text(f[col::CUSTOMER_ORDER_POS]);
    out.pallet = text(f[col::PALLET]);
    out.handling_unit = text(f[col::HANDLING_UNIT]);
    out.location = text(f[col::LOCATION]);

    for (idx, column) in STOCK_COLUMNS.iter().enumerate() {
        if column.core {
            continue;
        }
        let raw = f[idx];
        match column.ty {
            ColumnType::Text => {}
            ColumnType::Integer => {
                integer(line, column.name, raw)?;
            }
            ColumnType::Decimal => {
                decimal(line, column.name, raw)?;
            }
            ColumnType::Date => {
                date(line, column.name, raw)?;
            }
        }
        out.attributes.set(idx, normalize(raw).map(str::to_string));
    }

    Ok(out)
}

/// Render a line back into its 76 column values, in column order.
pub fn stock_line_to_record(line: &StockLine) -> Vec<String> {
    (0..STOCK_COLUMN_COUNT)
        .map(|idx| match idx {
            col::SEQUENCE => line.sequence.to_string(),
            col::ITEM_NUMBER => format_opt(&line.item),
            col::CLIENT => format_opt(&line.client),
            col::BATCH1 => format_opt(&line.batch1),
            col::BATCH2 => format_opt(&line.batch2),
            col::SERIAL_NUMBER => format_opt(&line.serial_number),
            col::CUSTOMER_ORDER => format_opt(&line.customer_order),
            col::CUSTOMER_ORDER_POS => format_opt(&line.customer_order_pos),
            col::PALLET => format_opt(&line.pallet),
            col::HANDLING_UNIT => format_opt(&line.handling_unit),
            col::LOCATION => format_opt(&line.location),
            col::QUANTITY_ON_HAND => line.quantity_on_hand.to_string(),
            _ => line.attributes.get(idx).unwrap_or_default().to_string(),
        })
        .collect()
}

/// Baseline loaded from a snapshot file.
#[derive(Clone, Debug, Default)]
pub struct StockSnapshot {
    /// Accepted lines in file order, first occurrence of each key only.
    pub lines: Vec<StockLine>,
    pub rejected: Vec<ErrorEntry>,
    /// Lines dropped because their key was already loaded.
    pub duplicates: usize,
}

/// Read a stock snapshot file.
///
/// Only failure to open or read the file is an error. Malformed lines are
/// collected in `rejected` and logged.
pub fn load_stock_snapshot(path: &Path) -> Result<StockSnapshot, ErrorEntry> {
    let file = File::open(path).map_err(|e| {
        ErrorEntry::parse_error(
            &path.display().to_string(),
            format!("Failed to open stock file: {e}"),
        )
    })?;
    read_stock_snapshot(file, &path.display().to_string())
}

/// [`load_stock_snapshot`] over any reader. `origin` names the source in errors.
pub fn read_stock_snapshot<R: Read>(reader: R, origin: &str) -> Result<StockSnapshot, ErrorEntry> {
    let mut snapshot = StockSnapshot::default();
    let mut seen = BTreeSet::new();
    let mut first = true;

    for record in snapshot_reader(reader).records() {
        let record = match record {
            Ok(r) => r,
            Err(e) if e.is_io_error() => {
                return Err(ErrorEntry::parse_error(
                    origin,
                    format!("Failed to read stock file: {e}"),
                ));
            }
            Err(e) => {
                let line_no = e.position().map(|p| p.line()).unwrap_or_default();
                warn!(line_no, "rejected stock line: {e}");
                snapshot
                    .rejected
                    .push(ErrorEntry::parse_error(origin, format!("Malformed stock line: {e}")));
                first = false;
                continue;
            }
        };
        let line_no = record.position().map(|p| p.line()).unwrap_or_default();

        let mut fields: Vec<&str> = record.iter().collect();
        if first {
            first = false;
            if let Some(f0) = fields.first_mut() {
                *f0 = strip_bom(*f0);
                if is_header_field(*f0) {
                    continue;
                }
            }
        }
        if is_blank(&record) {
            continue;
        }

        let raw = fields.join(",");
        match parse_stock_fields(&fields, &raw) {
            Ok(stock) => {
                if seen.insert(stock.sequence) {
                    snapshot.lines.push(stock);
                } else {
                    snapshot.duplicates += 1;
                }
            }
            Err(e) => {
                warn!(kind = %e.kind, line_no, "rejected stock line: {}", e.message);
                snapshot.rejected.push(e);
            }
        }
    }

    info!(
        origin,
        lines = snapshot.lines.len(),
        rejected = snapshot.rejected.len(),
        duplicates = snapshot.duplicates,
        "stock snapshot loaded"
    );
    Ok(snapshot)
}

fn is_blank(record: &StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|f| f.trim().is_empty())
}

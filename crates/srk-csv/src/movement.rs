use srk_schemas::{ErrorEntry, MovementEvent, MovementKind, MovementResult};

use crate::fields::{date, decimal, integer, normalize, required_integer, split_fields, text};

pub const MOVEMENT_FIELD_COUNT: usize = 22;

/// Journal columns in file order.
pub const MOVEMENT_COLUMNS: [&str; MOVEMENT_FIELD_COUNT] = [
    "SEQUENCE",
    "STOCK_KEY",
    "HANDLING_UNIT",
    "LOCATION",
    "ITEM_NUMBER",
    "SERIAL_NUMBER",
    "BATCH1",
    "BATCH2",
    "QUANTITY_CHANGE",
    "QUANTITY_TOTAL",
    "WEIGHT_CHANGE",
    "CLIENT",
    "EVENT",
    "PROCESS_CODE",
    "DATE",
    "TIME",
    "USER",
    "PRINT_FLAG",
    "DOCUMENT_REF1",
    "DOCUMENT_REF2",
    "CUSTOMER_ORDER",
    "CUSTOMER_ORDER_POS",
];

/// Parse one journal line.
///
/// Failures carry the raw line. The first failing field wins, scanning in
/// column order.
pub fn parse_movement_line(line: &str) -> MovementResult {
    if line.trim().is_empty() {
        return Err(ErrorEntry::parse_error(line, "Movement line is empty"));
    }

    let f = split_fields(line);
    if f.len() != MOVEMENT_FIELD_COUNT {
        return Err(ErrorEntry::invalid_field_count(
            line,
            MOVEMENT_FIELD_COUNT,
            f.len(),
        ));
    }

    let c = &MOVEMENT_COLUMNS;
    let sequence = required_integer(line, c[0], f[0])?;
    let stock_key = required_integer(line, c[1], f[1])?;

    let kind_raw = normalize(f[12]).unwrap_or("");
    let kind =
        MovementKind::from_code(kind_raw).ok_or_else(|| ErrorEntry::invalid_event(line, kind_raw))?;

    let mut ev = MovementEvent::new(sequence, stock_key, kind);
    ev.handling_unit = text(f[2]);
    ev.location = text(f[3]);
    ev.item = text(f[4]);
    ev.serial_number = text(f[5]);
    ev.batch1 = text(f[6]);
    ev.batch2 = text(f[7]);
    ev.quantity_change = decimal(line, c[8], f[8])?;
    ev.quantity_total = decimal(line, c[9], f[9])?;
    ev.weight_change = decimal(line, c[10], f[10])?;
    ev.client = integer(line, c[11], f[11])?;
    ev.process_code = integer(line, c[13], f[13])?;
    ev.date = date(line, c[14], f[14])?;
    ev.time = text(f[15]);
    ev.user = text(f[16]);
    ev.print_flag = text(f[17]);
    ev.document_ref1 = text(f[18]);
    ev.document_ref2 = text(f[19]);
    ev.customer_order = text(f[20]);
    ev.customer_order_pos = text(f[21]);
    ev.source = Some(line.to_string());

    Ok(ev)
}

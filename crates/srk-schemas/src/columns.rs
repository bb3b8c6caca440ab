//! Stock snapshot column schema.
//!
//! The snapshot carries 76 columns. Twelve of them are read or written by the
//! replay (the `StockLine` typed fields); the rest are opaque pass-through
//! values: type-validated on the way in, written back verbatim in column order.

/// How a column is validated and normalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    Decimal,
    Date,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StockColumn {
    pub name: &'static str,
    pub ty: ColumnType,
    /// True for columns mapped onto a typed `StockLine` field.
    pub core: bool,
}

const fn typed(name: &'static str, ty: ColumnType) -> StockColumn {
    StockColumn { name, ty, core: true }
}

const fn opaque(name: &'static str, ty: ColumnType) -> StockColumn {
    StockColumn { name, ty, core: false }
}

use ColumnType::{Date, Decimal, Integer, Text};

pub const STOCK_COLUMN_COUNT: usize = 76;

pub const STOCK_COLUMNS: [StockColumn; STOCK_COLUMN_COUNT] = [
    typed("SEQUENCE", Integer),
    typed("ITEM_NUMBER", Text),
    typed("CLIENT", Integer),
    typed("BATCH1", Text),
    typed("BATCH2", Text),
    typed("SERIAL_NUMBER", Text),
    typed("CUSTOMER_ORDER", Text),
    typed("CUSTOMER_ORDER_POS", Text),
    typed("PALLET", Text),
    typed("HANDLING_UNIT", Text),
    typed("LOCATION", Text),
    opaque("CONDITION", Integer),
    opaque("LOCK_FLAG", Integer),
    opaque("HANDLING_UNIT_TYPE", Integer),
    opaque("WEIGHT", Decimal),
    opaque("QUANTITY_INBOUND", Decimal),
    typed("QUANTITY_ON_HAND", Decimal),
    opaque("QUANTITY_RESERVED", Decimal),
    opaque("ORDER_NUMBER", Text),
    opaque("ORDER_POS", Text),
    opaque("STRATEGY_DATE", Date),
    opaque("INVENTORY_DATE", Date),
    opaque("INVENTORY_TIME", Text),
    opaque("INVENTORY_USER", Text),
    opaque("MOVEMENT_DATE", Date),
    opaque("MOVEMENT_TIME", Text),
    opaque("INVENTORY_FLAG", Text),
    opaque("POSITION_ON_PALLET", Integer),
    opaque("BEST_BEFORE", Text),
    opaque("UNSTABLE", Text),
    opaque("RECEIPT_STRATEGY", Integer),
    opaque("RECEIPT_DATE", Date),
    opaque("RECEIPT_NUMBER", Text),
    opaque("RECEIPT_POS", Integer),
    opaque("OPENED_FLAG", Text),
    opaque("QA_FLAG", Text),
    opaque("QA_DIFF", Decimal),
    opaque("QUANTITY_UNITS", Decimal),
    opaque("UNIT_NUMERATOR", Integer),
    opaque("UNIT_DENOMINATOR", Integer),
    opaque("NET_WEIGHT", Decimal),
    opaque("GROSS_WEIGHT", Decimal),
    opaque("REF_BASE_UNIT", Integer),
    opaque("REF_UNIT", Integer),
    opaque("REF_DELIVERY_UNIT", Integer),
    opaque("REF_SALES_UNIT", Integer),
    opaque("REF_PALLET", Integer),
    opaque("CREATED_DATE", Date),
    opaque("CREATED_TIME", Text),
    opaque("CREATED_USER", Text),
    opaque("CHANGED_DATE", Date),
    opaque("CHANGED_TIME", Text),
    opaque("CHANGED_USER", Text),
    opaque("LABEL_USER", Text),
    opaque("LABEL_TIME", Text),
    opaque("LABEL_DATE", Date),
    opaque("PICK_SEQUENCE", Integer),
    opaque("PURCHASE_ORDER", Text),
    opaque("PURCHASE_ORDER_POS", Text),
    opaque("FEEDBACK_DATE", Date),
    opaque("FEEDBACK_TIME", Text),
    opaque("FEEDBACK_SEQUENCE", Integer),
    opaque("FEEDBACK_FLAG", Text),
    opaque("PLANT", Text),
    opaque("TEXT1", Text),
    opaque("TEXT2", Text),
    opaque("QA_CHECKED", Text),
    opaque("BYPASS_FLAG", Text),
    opaque("CHECK_FLAG", Text),
    opaque("AUTO_STORE_PICK_FLAG", Text),
    opaque("AUTO_STORE_CAPABLE", Text),
    opaque("AUTO_STORE_WEIGHT_TOLERANCE", Decimal),
    opaque("STORAGE_AREA", Text),
    opaque("REF_INNER_UNIT", Integer),
    opaque("REF_OUTER_UNIT", Integer),
    opaque("FEEDBACK_SEQUENCE_ORIG", Integer),
];

/// Column positions of the typed `StockLine` fields.
pub mod col {
    pub const SEQUENCE: usize = 0;
    pub const ITEM_NUMBER: usize = 1;
    pub const CLIENT: usize = 2;
    pub const BATCH1: usize = 3;
    pub const BATCH2: usize = 4;
    pub const SERIAL_NUMBER: usize = 5;
    pub const CUSTOMER_ORDER: usize = 6;
    pub const CUSTOMER_ORDER_POS: usize = 7;
    pub const PALLET: usize = 8;
    pub const HANDLING_UNIT: usize = 9;
    pub const LOCATION: usize = 10;
    pub const QUANTITY_ON_HAND: usize = 16;
}

/// Position of a column by name (exact, upper-case).
pub fn stock_column_index(name: &str) -> Option<usize> {
    STOCK_COLUMNS.iter().position(|c| c.name == name)
}

pub fn stock_header() -> impl Iterator<Item = &'static str> {
    STOCK_COLUMNS.iter().map(|c| c.name)
}

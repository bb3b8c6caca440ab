use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Journal event kinds. The set is closed: the engine matches exhaustively,
/// so adding a variant forces every dispatch site to decide what it means.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    /// Re-materializes a previously removed line.
    Delete,
    MovementIn,
    MovementOut,
    MovementNeutral,
    BatchCorrectionIn,
    BatchCorrectionOut,
    InventoryCount,
    /// Removes the line entirely.
    GoodsReceipt,
}

impl MovementKind {
    pub const ALL: [MovementKind; 8] = [
        MovementKind::Delete,
        MovementKind::MovementIn,
        MovementKind::MovementOut,
        MovementKind::MovementNeutral,
        MovementKind::BatchCorrectionIn,
        MovementKind::BatchCorrectionOut,
        MovementKind::InventoryCount,
        MovementKind::GoodsReceipt,
    ];

    /// Journal wire code.
    pub fn code(&self) -> &'static str {
        match self {
            MovementKind::Delete => "LOESCH",
            MovementKind::MovementIn => "BEWGZU",
            MovementKind::MovementOut => "BEWGAB",
            MovementKind::MovementNeutral => "BEWGNG",
            MovementKind::BatchCorrectionIn => "MGKOZU",
            MovementKind::BatchCorrectionOut => "MGKOAB",
            MovementKind::InventoryCount => "INVZHL",
            MovementKind::GoodsReceipt => "WAREIN",
        }
    }

    /// Case-insensitive lookup of a wire code. Caller trims.
    pub fn from_code(code: &str) -> Option<MovementKind> {
        Self::ALL
            .into_iter()
            .find(|k| k.code().eq_ignore_ascii_case(code))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Delete => "DELETE",
            MovementKind::MovementIn => "MOVEMENT_IN",
            MovementKind::MovementOut => "MOVEMENT_OUT",
            MovementKind::MovementNeutral => "MOVEMENT_NEUTRAL",
            MovementKind::BatchCorrectionIn => "BATCH_CORRECTION_IN",
            MovementKind::BatchCorrectionOut => "BATCH_CORRECTION_OUT",
            MovementKind::InventoryCount => "INVENTORY_COUNT",
            MovementKind::GoodsReceipt => "GOODS_RECEIPT",
        }
    }

    /// Kinds that reverse a quantity delta on an existing line.
    pub fn is_quantity_event(&self) -> bool {
        !matches!(self, MovementKind::Delete | MovementKind::GoodsReceipt)
    }

    /// Transfers move stock between places; their reported total is not
    /// comparable with the line's on-hand quantity.
    pub fn is_transfer(&self) -> bool {
        matches!(
            self,
            MovementKind::MovementIn | MovementKind::MovementOut | MovementKind::MovementNeutral
        )
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One journal entry, immutable once parsed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementEvent {
    /// Journal sequence number. Must strictly decrease across the stream.
    pub sequence: i64,
    /// Key of the stock line this movement targets.
    pub stock_key: i64,
    pub handling_unit: Option<String>,
    pub location: Option<String>,
    pub item: Option<String>,
    pub serial_number: Option<String>,
    pub batch1: Option<String>,
    pub batch2: Option<String>,
    /// Signed delta. Absent means zero.
    pub quantity_change: Option<Decimal>,
    /// Quantity the journal reports after this movement.
    pub quantity_total: Option<Decimal>,
    pub weight_change: Option<Decimal>,
    pub client: Option<i64>,
    pub kind: MovementKind,
    pub process_code: Option<i64>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub user: Option<String>,
    pub print_flag: Option<String>,
    pub document_ref1: Option<String>,
    pub document_ref2: Option<String>,
    pub customer_order: Option<String>,
    pub customer_order_pos: Option<String>,
    /// Raw line this event was parsed from, kept for error diagnostics.
    #[serde(skip)]
    pub source: Option<String>,
}

impl MovementEvent {
    /// Minimal event; every optional field absent.
    pub fn new(sequence: i64, stock_key: i64, kind: MovementKind) -> Self {
        Self {
            sequence,
            stock_key,
            handling_unit: None,
            location: None,
            item: None,
            serial_number: None,
            batch1: None,
            batch2: None,
            quantity_change: None,
            quantity_total: None,
            weight_change: None,
            client: None,
            kind,
            process_code: None,
            date: None,
            time: None,
            user: None,
            print_flag: None,
            document_ref1: None,
            document_ref2: None,
            customer_order: None,
            customer_order_pos: None,
            source: None,
        }
    }

    /// The delta with "absent" folded to zero.
    pub fn change_or_zero(&self) -> Decimal {
        self.quantity_change.unwrap_or(Decimal::ZERO)
    }

    pub fn source_line(&self) -> &str {
        self.source.as_deref().unwrap_or("")
    }
}

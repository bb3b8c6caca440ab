use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::columns::{stock_column_index, STOCK_COLUMNS, STOCK_COLUMN_COUNT};
use crate::movement::MovementEvent;

/// Normalized pass-through values, indexed by snapshot column position.
///
/// Slots of core columns stay empty; those values live on `StockLine`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAttributes {
    values: Vec<Option<String>>,
}

impl Default for StockAttributes {
    fn default() -> Self {
        Self {
            values: vec![None; STOCK_COLUMN_COUNT],
        }
    }
}

impl StockAttributes {
    /// Value at column position `idx`. Core positions always yield `None`.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.values.get(idx).and_then(|v| v.as_deref())
    }

    /// Store a value at a pass-through position. Core or out-of-range
    /// positions are ignored.
    pub fn set(&mut self, idx: usize, value: Option<String>) {
        let is_pass_through = STOCK_COLUMNS.get(idx).map(|c| !c.core).unwrap_or(false);
        if !is_pass_through {
            return;
        }
        if self.values.len() < STOCK_COLUMN_COUNT {
            self.values.resize(STOCK_COLUMN_COUNT, None);
        }
        self.values[idx] = value;
    }

    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        stock_column_index(name).and_then(|i| self.get(i))
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

/// One inventory position.
///
/// `quantity_on_hand` may go zero or negative during a replay; cleanup
/// removes such lines afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLine {
    /// Stable key assigned by the source system.
    pub sequence: i64,
    pub item: Option<String>,
    pub client: Option<i64>,
    pub batch1: Option<String>,
    pub batch2: Option<String>,
    pub serial_number: Option<String>,
    pub customer_order: Option<String>,
    pub customer_order_pos: Option<String>,
    pub pallet: Option<String>,
    pub handling_unit: Option<String>,
    pub location: Option<String>,
    pub quantity_on_hand: Decimal,
    #[serde(default)]
    pub attributes: StockAttributes,
}

impl StockLine {
    pub fn new(sequence: i64, quantity_on_hand: Decimal) -> Self {
        Self {
            sequence,
            item: None,
            client: None,
            batch1: None,
            batch2: None,
            serial_number: None,
            customer_order: None,
            customer_order_pos: None,
            pallet: None,
            handling_unit: None,
            location: None,
            quantity_on_hand,
            attributes: StockAttributes::default(),
        }
    }

    /// Synthesize a line from a movement that references an unknown key.
    ///
    /// The movement reports its post-movement total and its delta, so the
    /// pre-movement quantity is `total - change`. Pallet and handling unit
    /// share the movement's handling-unit field. `None` when `total - change`
    /// is outside the decimal range.
    pub fn from_movement(ev: &MovementEvent) -> Option<Self> {
        let total = ev.quantity_total.unwrap_or(Decimal::ZERO);
        let quantity_on_hand = total.checked_sub(ev.change_or_zero())?;
        Some(Self {
            sequence: ev.stock_key,
            item: ev.item.clone(),
            client: ev.client,
            batch1: ev.batch1.clone(),
            batch2: ev.batch2.clone(),
            serial_number: ev.serial_number.clone(),
            customer_order: ev.customer_order.clone(),
            customer_order_pos: ev.customer_order_pos.clone(),
            pallet: ev.handling_unit.clone(),
            handling_unit: ev.handling_unit.clone(),
            location: ev.location.clone(),
            quantity_on_hand,
            attributes: StockAttributes::default(),
        })
    }

    pub fn is_depleted(&self) -> bool {
        self.quantity_on_hand <= Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::col;
    use crate::movement::MovementKind;
    use rust_decimal_macros::dec;

    #[test]
    fn from_movement_reconstructs_pre_movement_quantity() {
        let mut ev = MovementEvent::new(10, 4, MovementKind::MovementOut);
        ev.quantity_total = Some(dec!(2.000));
        ev.quantity_change = Some(dec!(-2.000));
        ev.handling_unit = Some("38280223L".to_string());
        ev.location = Some("001020200807".to_string());
        ev.client = Some(250);

        let line = StockLine::from_movement(&ev).unwrap();
        assert_eq!(line.sequence, 4);
        assert_eq!(line.quantity_on_hand, dec!(4.000));
        assert_eq!(line.pallet.as_deref(), Some("38280223L"));
        assert_eq!(line.handling_unit.as_deref(), Some("38280223L"));
        assert_eq!(line.location.as_deref(), Some("001020200807"));
        assert_eq!(line.client, Some(250));
        assert!(line.attributes.is_empty());
    }

    #[test]
    fn from_movement_without_change_uses_total() {
        let mut ev = MovementEvent::new(10, 4, MovementKind::Delete);
        ev.quantity_total = Some(dec!(2.000));
        assert_eq!(StockLine::from_movement(&ev).unwrap().quantity_on_hand, dec!(2.000));
    }

    #[test]
    fn from_movement_out_of_range_is_none() {
        let mut ev = MovementEvent::new(10, 4, MovementKind::MovementOut);
        ev.quantity_total = Some(Decimal::MAX);
        ev.quantity_change = Some(dec!(-1));
        assert!(StockLine::from_movement(&ev).is_none());
    }

    #[test]
    fn attributes_ignore_core_positions() {
        let mut attrs = StockAttributes::default();
        attrs.set(col::LOCATION, Some("X".to_string()));
        attrs.set(11, Some("3".to_string()));
        attrs.set(999, Some("ignored".to_string()));
        assert_eq!(attrs.get(col::LOCATION), None);
        assert_eq!(attrs.get(11), Some("3"));
        assert_eq!(attrs.get_by_name("CONDITION"), Some("3"));
        assert!(!attrs.is_empty());
    }

    #[test]
    fn depleted_at_zero_and_below() {
        assert!(StockLine::new(1, dec!(0)).is_depleted());
        assert!(StockLine::new(1, dec!(-1.5)).is_depleted());
        assert!(!StockLine::new(1, dec!(0.001)).is_depleted());
    }
}

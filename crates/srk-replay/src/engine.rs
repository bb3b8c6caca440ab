use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use srk_schemas::{ErrorEntry, MovementEvent, MovementKind, MovementResult, StockLine};

use crate::types::{ApplyOutcome, ReplayOutcome, StockMap};

/// Owns the stock map and error log for one replay run.
///
/// The engine is the only mutator of the map while movements are applied.
/// Callers read state through the accessors and take ownership with
/// [`ReplayEngine::into_outcome`] once the stream is exhausted.
#[derive(Clone, Debug)]
pub struct ReplayEngine {
    stock: StockMap,
    errors: Vec<ErrorEntry>,
    /// Sticky.
    critical: bool,
    /// `None` until the first ordered movement, so the first never regresses.
    last_sequence: Option<i64>,
    cutoff: Option<NaiveDate>,
    /// Keys frozen by a pre-cutoff movement. Each key is frozen at most once.
    finalized: BTreeSet<i64>,
}

impl ReplayEngine {
    /// Build from baseline lines. A later line with an already-seen key
    /// replaces the earlier one.
    pub fn new(lines: impl IntoIterator<Item = StockLine>, cutoff: Option<NaiveDate>) -> Self {
        let stock = lines.into_iter().map(|l| (l.sequence, l)).collect();
        Self::from_map(stock, cutoff)
    }

    pub fn from_map(stock: StockMap, cutoff: Option<NaiveDate>) -> Self {
        Self {
            stock,
            errors: Vec::new(),
            critical: false,
            last_sequence: None,
            cutoff,
            finalized: BTreeSet::new(),
        }
    }

    /// Apply one element of the movement stream.
    ///
    /// `None` models a producer that yielded nothing for this slot; it is
    /// recorded as a critical parse error.
    pub fn apply(&mut self, movement: Option<MovementResult>) -> ApplyOutcome {
        let ev = match movement {
            None => {
                self.record_critical(ErrorEntry::parse_error("", "received no movement"));
                return ApplyOutcome::Rejected;
            }
            Some(Err(e)) => {
                self.record_critical(e);
                return ApplyOutcome::Rejected;
            }
            Some(Ok(ev)) => ev,
        };

        if let Some(outcome) = self.finalize_before_cutoff(&ev) {
            return outcome;
        }

        self.check_order(&ev);

        let dispatched = match ev.kind {
            MovementKind::Delete => self.create_line(&ev),
            MovementKind::GoodsReceipt => {
                self.stock.remove(&ev.stock_key);
                Ok(())
            }
            MovementKind::MovementIn
            | MovementKind::MovementOut
            | MovementKind::MovementNeutral
            | MovementKind::BatchCorrectionIn
            | MovementKind::BatchCorrectionOut
            | MovementKind::InventoryCount => match self.stock.get_mut(&ev.stock_key) {
                Some(line) => mutate_line(line, &ev, &mut self.errors),
                None => self.create_line(&ev),
            },
        };

        match dispatched {
            Ok(()) => ApplyOutcome::Applied,
            Err(e) => {
                self.record_critical(e);
                ApplyOutcome::Rejected
            }
        }
    }

    pub fn apply_result(&mut self, movement: MovementResult) -> ApplyOutcome {
        self.apply(Some(movement))
    }

    /// Remove every line whose quantity on hand is zero or negative.
    /// Returns the number of lines removed. Idempotent.
    pub fn cleanup(&mut self) -> usize {
        let before = self.stock.len();
        self.stock.retain(|_, line| !line.is_depleted());
        before - self.stock.len()
    }

    pub fn stock(&self) -> &StockMap {
        &self.stock
    }

    pub fn stock_line(&self, key: i64) -> Option<&StockLine> {
        self.stock.get(&key)
    }

    pub fn errors(&self) -> &[ErrorEntry] {
        &self.errors
    }

    pub fn has_critical_errors(&self) -> bool {
        self.critical
    }

    pub fn cutoff(&self) -> Option<NaiveDate> {
        self.cutoff
    }

    pub fn last_sequence(&self) -> Option<i64> {
        self.last_sequence
    }

    pub fn finalized_keys(&self) -> &BTreeSet<i64> {
        &self.finalized
    }

    pub fn is_finalized(&self, key: i64) -> bool {
        self.finalized.contains(&key)
    }

    pub fn into_outcome(self) -> ReplayOutcome {
        ReplayOutcome {
            stock: self.stock,
            errors: self.errors,
            critical: self.critical,
        }
    }

    fn record_critical(&mut self, e: ErrorEntry) {
        self.errors.push(e);
        self.critical = true;
    }

    /// Pre-cutoff movements only carry their location onto an existing line,
    /// once per key. They bypass the ordering check.
    fn finalize_before_cutoff(&mut self, ev: &MovementEvent) -> Option<ApplyOutcome> {
        let cutoff = self.cutoff?;
        let date = ev.date?;
        if date >= cutoff {
            return None;
        }
        if !self.finalized.insert(ev.stock_key) {
            return Some(ApplyOutcome::IgnoredFinalized);
        }
        if let Some(line) = self.stock.get_mut(&ev.stock_key) {
            line.location = ev.location.clone();
        }
        Some(ApplyOutcome::Finalized)
    }

    /// Insert (or overwrite) the line synthesized from `ev`.
    fn create_line(&mut self, ev: &MovementEvent) -> Result<(), ErrorEntry> {
        let total = ev.quantity_total.unwrap_or(Decimal::ZERO);
        let line = StockLine::from_movement(ev).ok_or_else(|| overflow(ev, total))?;
        self.stock.insert(ev.stock_key, line);
        Ok(())
    }

    fn check_order(&mut self, ev: &MovementEvent) {
        if let Some(previous) = self.last_sequence {
            if ev.sequence >= previous {
                self.record_critical(ErrorEntry::movement_id_out_of_order(
                    ev.sequence,
                    previous,
                    ev.source_line(),
                ));
            }
        }
        self.last_sequence = Some(ev.sequence);
    }
}

/// Reverse one quantity movement on an existing line. A result outside the
/// decimal range leaves the line untouched.
fn mutate_line(
    line: &mut StockLine,
    ev: &MovementEvent,
    errors: &mut Vec<ErrorEntry>,
) -> Result<(), ErrorEntry> {
    let change = ev.change_or_zero();
    let reversed = line
        .quantity_on_hand
        .checked_sub(change)
        .ok_or_else(|| overflow(ev, line.quantity_on_hand))?;

    if !ev.kind.is_transfer() && ev.quantity_total != Some(line.quantity_on_hand) {
        let reported = ev
            .quantity_total
            .map(|t| t.to_string())
            .unwrap_or_else(|| "none".to_string());
        errors.push(ErrorEntry::movement_error(
            ev.source_line(),
            format!(
                "Stock quantity mismatch for key {}: on hand {}, reported total {}, change {} (movement {})",
                ev.stock_key, line.quantity_on_hand, reported, change, ev.sequence
            ),
        ));
    }

    line.quantity_on_hand = reversed;
    line.location = ev.location.clone();
    line.handling_unit = ev.handling_unit.clone();
    line.pallet = ev.handling_unit.clone();
    Ok(())
}

fn overflow(ev: &MovementEvent, on_hand: Decimal) -> ErrorEntry {
    ErrorEntry::quantity_overflow(
        ev.stock_key,
        &on_hand.to_string(),
        &ev.change_or_zero().to_string(),
        ev.source_line(),
    )
}

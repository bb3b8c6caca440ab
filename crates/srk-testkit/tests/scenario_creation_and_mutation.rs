//! Line creation and in-place mutation arithmetic.
//!
//! GREEN when:
//! - an unknown key is created at `total - change`
//! - a transfer on a known key reverses its delta with no mismatch error
//! - a non-transfer whose reported total disagrees records one non-critical
//!   MOVEMENT_ERROR and still reverses its delta

use rust_decimal_macros::dec;
use srk_replay::ReplayEngine;
use srk_schemas::{ErrorKind, MovementKind};
use srk_testkit::{dec as d, movement, stock};

#[test]
fn movement_out_on_absent_key_creates_line() {
    let mut engine = ReplayEngine::new(Vec::new(), None);
    let mut ev = movement(10, 4, MovementKind::MovementOut);
    ev.quantity_total = Some(d("2.000"));
    ev.quantity_change = Some(d("-2.000"));
    ev.location = Some("001020200807".to_string());
    ev.handling_unit = Some("38280223L".to_string());

    engine.apply_result(Ok(ev));

    let line = engine.stock_line(4).expect("line created");
    assert_eq!(line.quantity_on_hand, dec!(4.000));
    assert_eq!(line.quantity_on_hand.to_string(), "4.000");
    assert_eq!(line.location.as_deref(), Some("001020200807"));
    assert_eq!(line.pallet.as_deref(), Some("38280223L"));
    assert!(engine.errors().is_empty());
}

#[test]
fn movement_out_on_known_key_reverses_without_mismatch() {
    let mut engine = ReplayEngine::new(vec![stock(1, "5.000")], None);
    let mut ev = movement(10, 1, MovementKind::MovementOut);
    ev.quantity_total = Some(d("2.000"));
    ev.quantity_change = Some(d("-2.000"));
    ev.location = Some("NEW-LOC".to_string());

    engine.apply_result(Ok(ev));

    let line = engine.stock_line(1).unwrap();
    assert_eq!(line.quantity_on_hand, dec!(7.000));
    assert_eq!(line.location.as_deref(), Some("NEW-LOC"));
    assert!(engine.errors().is_empty(), "transfers skip the mismatch check");
    assert!(!engine.has_critical_errors());
}

#[test]
fn inventory_count_mismatch_is_recorded_and_applied() {
    let mut engine = ReplayEngine::new(vec![stock(1, "5.000")], None);
    let mut ev = movement(10, 1, MovementKind::InventoryCount);
    ev.quantity_total = Some(d("2.000"));
    ev.quantity_change = Some(d("-2.000"));

    engine.apply_result(Ok(ev));

    assert_eq!(engine.errors().len(), 1);
    assert_eq!(engine.errors()[0].kind, ErrorKind::MovementError);
    assert!(!engine.has_critical_errors());
    assert_eq!(engine.stock_line(1).unwrap().quantity_on_hand, dec!(7.000));
}

#[test]
fn matching_total_records_nothing() {
    let mut engine = ReplayEngine::new(vec![stock(1, "5.000")], None);
    let mut ev = movement(10, 1, MovementKind::BatchCorrectionOut);
    ev.quantity_total = Some(d("5"));
    ev.quantity_change = Some(d("-1.000"));

    engine.apply_result(Ok(ev));

    assert!(engine.errors().is_empty());
    assert_eq!(engine.stock_line(1).unwrap().quantity_on_hand, dec!(6.000));
}

#[test]
fn delete_rematerializes_removed_line() {
    let mut engine = ReplayEngine::new(vec![stock(1, "5.000")], None);
    engine.apply_result(Ok(movement(10, 1, MovementKind::GoodsReceipt)));
    assert!(engine.stock_line(1).is_none());

    let mut ev = movement(9, 1, MovementKind::Delete);
    ev.quantity_total = Some(d("3.000"));
    engine.apply_result(Ok(ev));

    assert_eq!(engine.stock_line(1).unwrap().quantity_on_hand, dec!(3.000));
    assert!(engine.errors().is_empty());
}

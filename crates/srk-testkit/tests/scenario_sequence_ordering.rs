//! Movement sequence numbers must strictly decrease across a replay.
//!
//! GREEN when:
//! - a strictly decreasing stream records no ordering error
//! - an increase or a repeat records exactly one MOVEMENT_ID_OUT_OF_ORDER
//!   and raises the critical flag
//! - the offending movement is still applied

use srk_replay::{replay_stream, MovementHistory, ReplayEngine};
use srk_schemas::{ErrorKind, MovementKind};
use srk_testkit::{movement, stock};

#[test]
fn decreasing_sequences_record_no_error() {
    let mut engine = ReplayEngine::new(vec![stock(1, "5.000")], None);

    engine.apply_result(Ok(movement(5, 2, MovementKind::GoodsReceipt)));
    engine.apply_result(Ok(movement(3, 3, MovementKind::GoodsReceipt)));

    assert!(engine.errors().is_empty());
    assert!(!engine.has_critical_errors());
}

#[test]
fn increasing_sequence_records_exactly_one_error() {
    let mut engine = ReplayEngine::new(vec![stock(1, "5.000")], None);

    engine.apply_result(Ok(movement(3, 2, MovementKind::GoodsReceipt)));
    engine.apply_result(Ok(movement(5, 1, MovementKind::GoodsReceipt)));

    let ordering: Vec<_> = engine
        .errors()
        .iter()
        .filter(|e| e.kind == ErrorKind::MovementIdOutOfOrder)
        .collect();
    assert_eq!(ordering.len(), 1);
    assert_eq!(engine.errors().len(), 1);
    assert!(engine.has_critical_errors());
    assert!(engine.stock_line(1).is_none(), "out-of-order receipt still applied");
}

#[test]
fn repeated_sequence_is_out_of_order() {
    let mut engine = ReplayEngine::new(Vec::new(), None);

    engine.apply_result(Ok(movement(4, 1, MovementKind::GoodsReceipt)));
    engine.apply_result(Ok(movement(4, 2, MovementKind::GoodsReceipt)));

    assert_eq!(engine.errors().len(), 1);
    assert_eq!(engine.errors()[0].kind, ErrorKind::MovementIdOutOfOrder);
    assert!(engine.has_critical_errors());
}

#[test]
fn each_regression_is_compared_with_the_previous_movement() {
    let mut engine = ReplayEngine::new(Vec::new(), None);
    let stream = [9, 7, 8, 6, 2, 3]
        .into_iter()
        .map(|seq| Ok(movement(seq, 100 + seq, MovementKind::GoodsReceipt)));

    let summary = replay_stream(&mut engine, stream, &mut MovementHistory::disabled());

    assert_eq!(summary.seen, 6);
    assert_eq!(summary.applied, 6);
    let messages: Vec<&str> = engine.errors().iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Movement ID 8 out of order (previous 7)",
            "Movement ID 3 out of order (previous 2)",
        ]
    );
}

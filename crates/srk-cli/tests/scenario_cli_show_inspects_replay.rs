//! `srk show` replays in memory and prints views without writing files.
//!
//! GREEN when:
//! - the filter narrows the table case-insensitively
//! - --errors lists classified errors
//! - --history lists the movements applied to one key
//! - nothing is written to the working directory

use assert_cmd::prelude::*;
use predicates::prelude::*;
use srk_schemas::MovementKind;
use srk_testkit::{Fixture, MovementRow, StockRow};
use std::process::Command;

fn fixture() -> Fixture {
    Fixture::new(
        &[
            StockRow::new(1, "5.000").item("WIDGET-A").location("001020200807"),
            StockRow::new(2, "3.000").item("gadget-b").location("001020200808"),
        ],
        &[
            MovementRow::new(30, 1, MovementKind::MovementOut)
                .change("-1.000")
                .total("5.000")
                .location("001AK0100000"),
            MovementRow::new(20, 2, MovementKind::InventoryCount)
                .change("1.000")
                .total("9.000"),
            MovementRow::new(10, 1, MovementKind::MovementIn)
                .change("2.000")
                .total("6.000"),
        ],
    )
    .unwrap()
}

fn show_cmd(fx: &Fixture) -> anyhow::Result<Command> {
    let mut cmd = Command::cargo_bin("srk")?;
    cmd.current_dir(fx.dir())
        .args(["show", "--stock"])
        .arg(&fx.stock_csv)
        .arg("--movements")
        .arg(&fx.movement_csv);
    Ok(cmd)
}

#[test]
fn filter_narrows_the_table() -> anyhow::Result<()> {
    let fx = fixture();
    show_cmd(&fx)?
        .args(["--filter", "Gadget"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gadget-b"))
        .stdout(predicate::str::contains("WIDGET-A").not())
        .stdout(predicate::str::contains("lines_shown=1 lines_total=2"));

    let results = fx.dir().join("results");
    assert!(!results.exists(), "show must not write outputs");
    Ok(())
}

#[test]
fn errors_view_lists_quantity_mismatch() -> anyhow::Result<()> {
    let fx = fixture();
    show_cmd(&fx)?
        .arg("--errors")
        .assert()
        .success()
        .stdout(predicate::str::contains("MOVEMENT_ERROR"))
        .stdout(predicate::str::contains("Stock quantity mismatch for key 2"))
        .stdout(predicate::str::contains("critical=false"));
    Ok(())
}

#[test]
fn history_view_lists_applied_movements_for_one_key() -> anyhow::Result<()> {
    let fx = fixture();
    show_cmd(&fx)?
        .args(["--history", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("history key=1 movements=2"))
        .stdout(predicate::str::contains("seq=30 kind="))
        .stdout(predicate::str::contains("seq=10 kind="));
    Ok(())
}

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use srk_schemas::{stock_header, ErrorEntry, StockLine};

use crate::stock::stock_line_to_record;

pub const ERRORS_HEADER: [&str; 3] = ["TYPE", "MESSAGE", "LINE"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrittenFiles {
    pub stocks: PathBuf,
    pub errors: PathBuf,
}

pub fn stocks_file_name(stamp: &str) -> String {
    format!("stocks_{stamp}.csv")
}

pub fn errors_file_name(stamp: &str) -> String {
    format!("errors_{stamp}.csv")
}

/// Write the reconstructed stock and the error log into `dir`.
///
/// Stock lines are emitted in ascending key order, one header row first.
/// Error fields are quoted when they contain separators, quotes or newlines.
pub fn write_results(
    dir: &Path,
    stamp: &str,
    stock: &BTreeMap<i64, StockLine>,
    errors: &[ErrorEntry],
) -> Result<WrittenFiles, ErrorEntry> {
    fs::create_dir_all(dir).map_err(|e| {
        ErrorEntry::write_error(
            &dir.display().to_string(),
            format!("Failed to create output directory: {e}"),
        )
    })?;

    let stocks = dir.join(stocks_file_name(stamp));
    write_stocks(&stocks, stock).map_err(|e| {
        ErrorEntry::write_error(
            &stocks.display().to_string(),
            format!("Failed to write stocks file: {e}"),
        )
    })?;

    let errors_path = dir.join(errors_file_name(stamp));
    write_errors(&errors_path, errors).map_err(|e| {
        ErrorEntry::write_error(
            &errors_path.display().to_string(),
            format!("Failed to write errors file: {e}"),
        )
    })?;

    Ok(WrittenFiles {
        stocks,
        errors: errors_path,
    })
}

fn write_stocks(path: &Path, stock: &BTreeMap<i64, StockLine>) -> Result<(), csv::Error> {
    let mut w = csv::Writer::from_path(path)?;
    w.write_record(stock_header())?;
    for line in stock.values() {
        w.write_record(stock_line_to_record(line))?;
    }
    w.flush()?;
    Ok(())
}

fn write_errors(path: &Path, errors: &[ErrorEntry]) -> Result<(), csv::Error> {
    let mut w = csv::Writer::from_path(path)?;
    w.write_record(ERRORS_HEADER)?;
    for e in errors {
        w.write_record([e.kind.as_str(), e.message.as_str(), e.line.as_str()])?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock::read_stock_snapshot;
    use rust_decimal_macros::dec;
    use srk_schemas::ErrorKind;

    fn stock() -> BTreeMap<i64, StockLine> {
        let mut b = StockLine::new(20, dec!(1.500));
        b.location = Some("LOC-B".to_string());
        let mut a = StockLine::new(10, dec!(5.000));
        a.item = Some("103098".to_string());
        a.batch1 = Some("PIPE 12\"".to_string());
        a.location = Some("HALL 2, RACK 7".to_string());
        [b, a].into_iter().map(|l| (l.sequence, l)).collect()
    }

    #[test]
    fn writes_both_files_with_headers_in_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results");
        let errors = vec![ErrorEntry::movement_error("a,b", "say \"hi\"")];

        let files = write_results(&out, "20260219_164517", &stock(), &errors).unwrap();
        assert!(files.stocks.ends_with("stocks_20260219_164517.csv"));
        assert!(files.errors.ends_with("errors_20260219_164517.csv"));

        let stocks = std::fs::read_to_string(&files.stocks).unwrap();
        let rows: Vec<&str> = stocks.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("SEQUENCE,ITEM_NUMBER,CLIENT"));
        assert!(rows[1].starts_with("10,103098,"));
        assert!(rows[2].starts_with("20,,"));

        let errs = std::fs::read_to_string(&files.errors).unwrap();
        assert_eq!(
            errs.lines().collect::<Vec<_>>(),
            vec!["TYPE,MESSAGE,LINE", "MOVEMENT_ERROR,\"say \"\"hi\"\"\",\"a,b\""]
        );
    }

    #[test]
    fn written_stock_reloads_identically() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_results(dir.path(), "s", &stock(), &[]).unwrap();
        let text = std::fs::read_to_string(&files.stocks).unwrap();
        let snap = read_stock_snapshot(text.as_bytes(), "mem").unwrap();
        let reloaded: BTreeMap<_, _> = snap.lines.into_iter().map(|l| (l.sequence, l)).collect();
        assert_eq!(reloaded, stock());

        // A second write of the reloaded map is byte-identical.
        let again = write_results(&dir.path().join("again"), "s", &reloaded, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&again.stocks).unwrap(), text);
    }

    #[test]
    fn unwritable_directory_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let e = write_results(&blocker.join("sub"), "s", &stock(), &[]).unwrap_err();
        assert_eq!(e.kind, ErrorKind::WriteError);
    }
}

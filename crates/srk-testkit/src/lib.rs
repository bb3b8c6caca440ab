//! Fixture builders for replay scenario tests.
//!
//! `MovementRow` / `StockRow` render export-shaped CSV lines (22 and 76
//! columns); `Fixture` writes them into a temp directory the way the source
//! system drops its end-of-day files.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use srk_schemas::{col, MovementEvent, MovementKind, StockLine, STOCK_COLUMN_COUNT};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::TempDir;

pub const MOVEMENT_HEADER: &str = "LFDNR,BESTANDNR,LHMNR,PLATZ,ARTIKELNR,SERIENNR,CHARGE1,CHARGE2,MENGE_AEND,MENGE_GES,GEW_AEND,MANDANT,EREIGNIS,VGS,DATUM,ZEIT,USR,DRUCK_KNZ,BELEG1,BELEG2,KD_AUFTRAG,KD_POS";

pub fn stock(key: i64, qty: &str) -> StockLine {
    StockLine::new(key, dec(qty))
}

pub fn movement(sequence: i64, stock_key: i64, kind: MovementKind) -> MovementEvent {
    MovementEvent::new(sequence, stock_key, kind)
}

/// Decimal from a literal; panics on bad input (fixtures only).
pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap_or_else(|e| panic!("bad decimal fixture '{s}': {e}"))
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_else(|e| panic!("bad date fixture '{s}': {e}"))
}

/// One journal line. Unset fields render empty.
#[derive(Clone, Debug)]
pub struct MovementRow {
    pub sequence: String,
    pub stock_key: String,
    pub code: String,
    pub handling_unit: String,
    pub location: String,
    pub item: String,
    pub batch1: String,
    pub change: String,
    pub total: String,
    pub client: String,
    pub date: String,
}

impl MovementRow {
    pub fn new(sequence: i64, stock_key: i64, kind: MovementKind) -> Self {
        Self {
            sequence: sequence.to_string(),
            stock_key: stock_key.to_string(),
            code: kind.code().to_string(),
            handling_unit: String::new(),
            location: String::new(),
            item: String::new(),
            batch1: String::new(),
            change: String::new(),
            total: String::new(),
            client: "250".to_string(),
            date: String::new(),
        }
    }

    /// Raw event code, for malformed-input scenarios.
    pub fn code(mut self, raw: &str) -> Self {
        self.code = raw.to_string();
        self
    }

    pub fn change(mut self, v: &str) -> Self {
        self.change = v.to_string();
        self
    }

    pub fn total(mut self, v: &str) -> Self {
        self.total = v.to_string();
        self
    }

    pub fn location(mut self, v: &str) -> Self {
        self.location = v.to_string();
        self
    }

    pub fn handling_unit(mut self, v: &str) -> Self {
        self.handling_unit = v.to_string();
        self
    }

    pub fn item(mut self, v: &str) -> Self {
        self.item = v.to_string();
        self
    }

    pub fn batch1(mut self, v: &str) -> Self {
        self.batch1 = v.to_string();
        self
    }

    pub fn date(mut self, v: &str) -> Self {
        self.date = v.to_string();
        self
    }

    pub fn to_line(&self) -> String {
        [
            self.sequence.as_str(),
            self.stock_key.as_str(),
            self.handling_unit.as_str(),
            self.location.as_str(),
            self.item.as_str(),
            "",
            self.batch1.as_str(),
            "____________________",
            self.change.as_str(),
            self.total.as_str(),
            "",
            self.client.as_str(),
            self.code.as_str(),
            "25",
            self.date.as_str(),
            "",
            "TEST",
            "N",
            "",
            "",
            "____________________",
            "__________",
        ]
        .join(",")
    }
}

/// One 76-column snapshot line with only the typed columns filled in.
#[derive(Clone, Debug)]
pub struct StockRow {
    values: Vec<String>,
}

impl StockRow {
    pub fn new(key: i64, quantity: &str) -> Self {
        let mut values = vec![String::new(); STOCK_COLUMN_COUNT];
        values[col::SEQUENCE] = key.to_string();
        values[col::CLIENT] = "250".to_string();
        values[col::QUANTITY_ON_HAND] = quantity.to_string();
        Self { values }
    }

    fn set(mut self, idx: usize, v: &str) -> Self {
        self.values[idx] = v.to_string();
        self
    }

    pub fn item(self, v: &str) -> Self {
        self.set(col::ITEM_NUMBER, v)
    }

    pub fn location(self, v: &str) -> Self {
        self.set(col::LOCATION, v)
    }

    /// Sets pallet and handling unit together, as the source system does.
    pub fn handling_unit(self, v: &str) -> Self {
        self.set(col::PALLET, v).set(col::HANDLING_UNIT, v)
    }

    pub fn batch1(self, v: &str) -> Self {
        self.set(col::BATCH1, v)
    }

    /// Raw value at any column position.
    pub fn column(self, idx: usize, v: &str) -> Self {
        self.set(idx, v)
    }

    pub fn to_line(&self) -> String {
        self.values.join(",")
    }
}

pub fn write_lines(path: &Path, header: Option<&str>, lines: &[String]) -> Result<()> {
    let mut body = String::new();
    if let Some(h) = header {
        body.push_str(h);
        body.push('\n');
    }
    for l in lines {
        body.push_str(l);
        body.push('\n');
    }
    fs::write(path, body).with_context(|| format!("write fixture: {}", path.display()))
}

/// Snapshot + journal pair in a private temp directory.
pub struct Fixture {
    dir: TempDir,
    pub stock_csv: PathBuf,
    pub movement_csv: PathBuf,
}

impl Fixture {
    pub fn new(stock: &[StockRow], movements: &[MovementRow]) -> Result<Self> {
        let stock_lines: Vec<String> = stock.iter().map(StockRow::to_line).collect();
        let movement_lines: Vec<String> = movements.iter().map(MovementRow::to_line).collect();
        Self::from_lines(&stock_lines, &movement_lines)
    }

    /// Raw lines, for malformed-input scenarios. Journal gets a header row.
    pub fn from_lines(stock: &[String], movements: &[String]) -> Result<Self> {
        let dir = tempfile::tempdir().context("create fixture dir")?;
        let stock_csv = dir.path().join("PLSTORE_ES_BESTAND_EOD.csv");
        let movement_csv = dir.path().join("PLSTORE_ES_BESTJOUR_EOD.csv");
        write_lines(&stock_csv, None, stock)?;
        write_lines(&movement_csv, Some(MOVEMENT_HEADER), movements)?;
        Ok(Self {
            dir,
            stock_csv,
            movement_csv,
        })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file next to the inputs (config overlays and the like).
    pub fn write_file(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).with_context(|| format!("write fixture: {}", path.display()))?;
        Ok(path)
    }
}

/// Read a stocks output file into `key -> QUANTITY_ON_HAND` text.
pub fn load_stock_quantities(path: &Path) -> Result<BTreeMap<i64, String>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("open stocks csv: {}", path.display()))?;
    let headers = rdr.headers()?.clone();
    let key_idx = headers
        .iter()
        .position(|h| h == "SEQUENCE")
        .context("stocks csv has no SEQUENCE column")?;
    let qty_idx = headers
        .iter()
        .position(|h| h == "QUANTITY_ON_HAND")
        .context("stocks csv has no QUANTITY_ON_HAND column")?;

    let mut out = BTreeMap::new();
    for rec in rdr.records() {
        let rec = rec?;
        let key: i64 = rec[key_idx].parse().context("parse SEQUENCE")?;
        out.insert(key, rec[qty_idx].to_string());
    }
    Ok(out)
}

/// Read an errors output file into `(TYPE, MESSAGE, LINE)` rows.
pub fn load_error_rows(path: &Path) -> Result<Vec<(String, String, String)>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("open errors csv: {}", path.display()))?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        out.push((rec[0].to_string(), rec[1].to_string(), rec[2].to_string()));
    }
    Ok(out)
}

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde_json::Value;
use std::path::PathBuf;

pub const DEFAULT_STOCK_CSV: &str = "PLSTORE_ES_BESTAND_EOD.csv";
pub const DEFAULT_MOVEMENT_CSV: &str = "PLSTORE_ES_BESTJOUR_EOD.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "results";

/// Typed view of the keys a replay run reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySettings {
    pub stock_csv: PathBuf,
    pub movement_csv: PathBuf,
    /// Movements dated strictly before this day only finalize locations.
    pub as_of: Option<NaiveDate>,
    pub fail_on_critical: bool,
    pub output_dir: PathBuf,
    pub write_manifest: bool,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            stock_csv: PathBuf::from(DEFAULT_STOCK_CSV),
            movement_csv: PathBuf::from(DEFAULT_MOVEMENT_CSV),
            as_of: None,
            fail_on_critical: false,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            write_manifest: true,
        }
    }
}

impl ReplaySettings {
    /// Read settings from merged config JSON. Absent or null keys keep their
    /// defaults; a present key of the wrong type is an error naming the pointer.
    pub fn from_config_json(v: &Value) -> Result<Self> {
        let mut s = Self::default();

        if let Some(p) = str_at(v, "/input/stock_csv")? {
            s.stock_csv = PathBuf::from(p);
        }
        if let Some(p) = str_at(v, "/input/movement_csv")? {
            s.movement_csv = PathBuf::from(p);
        }
        if let Some(d) = str_at(v, "/replay/as_of")? {
            s.as_of = Some(parse_as_of(d).context("config /replay/as_of")?);
        }
        if let Some(b) = bool_at(v, "/replay/fail_on_critical")? {
            s.fail_on_critical = b;
        }
        if let Some(p) = str_at(v, "/output/dir")? {
            s.output_dir = PathBuf::from(p);
        }
        if let Some(b) = bool_at(v, "/output/write_manifest")? {
            s.write_manifest = b;
        }

        Ok(s)
    }
}

/// Cutoff dates are `YYYY-MM-DD`.
pub fn parse_as_of(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid cutoff date '{raw}' (expected YYYY-MM-DD)"))
}

fn str_at<'a>(v: &'a Value, ptr: &str) -> Result<Option<&'a str>> {
    match v.pointer(ptr) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => bail!("CONFIG_TYPE_MISMATCH {ptr}: expected string, got {other}"),
    }
}

fn bool_at(v: &Value, ptr: &str) -> Result<Option<bool>> {
    match v.pointer(ptr) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => bail!("CONFIG_TYPE_MISMATCH {ptr}: expected bool, got {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_config_yields_defaults() {
        let s = ReplaySettings::from_config_json(&json!({})).unwrap();
        assert_eq!(s, ReplaySettings::default());
        assert_eq!(s.output_dir, PathBuf::from("results"));
        assert!(s.write_manifest);
    }

    #[test]
    fn reads_every_key() {
        let v = json!({
            "input": {"stock_csv": "s.csv", "movement_csv": "m.csv"},
            "replay": {"as_of": "2026-02-01", "fail_on_critical": true},
            "output": {"dir": "out", "write_manifest": false}
        });
        let s = ReplaySettings::from_config_json(&v).unwrap();
        assert_eq!(s.stock_csv, PathBuf::from("s.csv"));
        assert_eq!(s.movement_csv, PathBuf::from("m.csv"));
        assert_eq!(s.as_of, NaiveDate::from_ymd_opt(2026, 2, 1));
        assert!(s.fail_on_critical);
        assert_eq!(s.output_dir, PathBuf::from("out"));
        assert!(!s.write_manifest);
    }

    #[test]
    fn null_cutoff_means_none() {
        let s = ReplaySettings::from_config_json(&json!({"replay": {"as_of": null}})).unwrap();
        assert_eq!(s.as_of, None);
    }

    #[test]
    fn wrong_types_name_the_pointer() {
        let err = ReplaySettings::from_config_json(&json!({"replay": {"fail_on_critical": "yes"}}))
            .unwrap_err();
        assert!(err.to_string().contains("/replay/fail_on_critical"));

        let err = ReplaySettings::from_config_json(&json!({"replay": {"as_of": "01.02.2026"}}))
            .unwrap_err();
        assert!(format!("{err:#}").contains("01.02.2026"));
    }
}

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const SCHEMA_VERSION: i32 = 1;

/// File-name stamp shared by every output of one run.
pub const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub fn run_stamp(at: NaiveDateTime) -> String {
    at.format(STAMP_FORMAT).to_string()
}

pub fn manifest_file_name(stamp: &str) -> String {
    format!("manifest_{stamp}.json")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: i32,
    pub run_id: Uuid,
    pub stamp: String,
    pub created_at_utc: DateTime<Utc>,
    /// Empty when the run used no config file.
    pub config_hash: String,
    pub inputs: RunInputs,
    pub cutoff: Option<NaiveDate>,
    pub counts: RunCounts,
    pub artifacts: ArtifactList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInputs {
    pub stock_csv: String,
    pub movement_csv: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounts {
    pub snapshot_lines: u64,
    pub snapshot_rejected: u64,
    pub snapshot_duplicates: u64,
    pub movements_seen: u64,
    pub movements_applied: u64,
    pub movements_finalized: u64,
    pub movements_ignored: u64,
    pub movements_rejected: u64,
    pub errors: u64,
    pub critical: bool,
    pub lines_before_cleanup: u64,
    pub lines_after_cleanup: u64,
}

/// Output file names, relative to the run's output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactList {
    pub stocks_csv: String,
    pub errors_csv: String,
    pub manifest_json: String,
}

impl RunManifest {
    /// New manifest with a fresh run id. Counts start at zero.
    ///
    /// `outputs` are the files the writer actually produced; only their file
    /// names are recorded.
    pub fn new(
        stamp: &str,
        config_hash: &str,
        inputs: RunInputs,
        cutoff: Option<NaiveDate>,
        outputs: RunOutputs<'_>,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            run_id: Uuid::new_v4(),
            stamp: stamp.to_string(),
            created_at_utc: Utc::now(),
            config_hash: config_hash.to_string(),
            inputs,
            cutoff,
            counts: RunCounts::default(),
            artifacts: ArtifactList {
                stocks_csv: file_name(outputs.stocks),
                errors_csv: file_name(outputs.errors),
                manifest_json: manifest_file_name(stamp),
            },
        }
    }
}

/// Paths of the result files written for one run.
#[derive(Debug, Clone, Copy)]
pub struct RunOutputs<'a> {
    pub stocks: &'a Path,
    pub errors: &'a Path,
}

fn file_name(p: &Path) -> String {
    p.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| p.display().to_string())
}

/// Write `manifest_<stamp>.json` into `dir`, creating it if needed.
pub fn write_manifest(dir: &Path, manifest: &RunManifest) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("create output dir failed: {}", dir.display()))?;

    let path = dir.join(&manifest.artifacts.manifest_json);
    let json = serde_json::to_string_pretty(manifest).context("serialize manifest failed")?;
    fs::write(&path, format!("{json}\n"))
        .with_context(|| format!("write manifest failed: {}", path.display()))?;
    Ok(path)
}

pub fn read_manifest(path: &Path) -> Result<RunManifest> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read manifest failed: {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse manifest failed: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outputs() -> RunOutputs<'static> {
        RunOutputs {
            stocks: Path::new("stocks.csv"),
            errors: Path::new("errors.csv"),
        }
    }

    fn inputs() -> RunInputs {
        RunInputs {
            stock_csv: "PLSTORE_ES_BESTAND_EOD.csv".to_string(),
            movement_csv: "PLSTORE_ES_BESTJOUR_EOD.csv".to_string(),
        }
    }

    #[test]
    fn stamp_format() {
        let at = NaiveDate::from_ymd_opt(2026, 2, 19)
            .unwrap()
            .and_hms_opt(16, 45, 7)
            .unwrap();
        assert_eq!(run_stamp(at), "20260219_164507");
        assert_eq!(manifest_file_name("20260219_164507"), "manifest_20260219_164507.json");
    }

    #[test]
    fn manifest_records_written_file_names() {
        let m = RunManifest::new(
            "s1",
            "",
            inputs(),
            None,
            RunOutputs {
                stocks: Path::new("/tmp/out/stocks_s1.csv"),
                errors: Path::new("/tmp/out/errors_s1.csv"),
            },
        );
        assert_eq!(m.artifacts.stocks_csv, "stocks_s1.csv");
        assert_eq!(m.artifacts.errors_csv, "errors_s1.csv");
        assert_eq!(m.artifacts.manifest_json, "manifest_s1.json");
        assert_eq!(m.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn run_ids_are_unique() {
        let a = RunManifest::new("s", "", inputs(), None, outputs());
        let b = RunManifest::new("s", "", inputs(), None, outputs());
        assert_ne!(a.run_id, b.run_id);
    }

    #[test]
    fn write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results");
        let mut m = RunManifest::new(
            "s2",
            "abc",
            inputs(),
            NaiveDate::from_ymd_opt(2026, 2, 1),
            outputs(),
        );
        m.counts.movements_seen = 12;
        m.counts.critical = true;

        let path = write_manifest(&out, &m).unwrap();
        assert!(path.ends_with("manifest_s2.json"));

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"cutoff\": \"2026-02-01\""));
        assert_eq!(read_manifest(&path).unwrap(), m);
    }
}

//! `srk replay`: the batch run. Writes stocks, errors and manifest files.

use anyhow::{bail, Context, Result};
use chrono::Local;
use srk_artifacts::{run_stamp, write_manifest, RunCounts, RunInputs, RunManifest, RunOutputs};
use srk_config::ConfigMode;
use srk_csv::write_results;
use srk_replay::MovementHistory;
use std::path::PathBuf;
use tracing::{info, warn};

use super::{resolve_settings, run_pipeline, InputArgs};

pub fn replay(input: InputArgs, out: Option<PathBuf>, strict: bool) -> Result<()> {
    let (mut settings, loaded) = resolve_settings(&input, ConfigMode::Replay)?;
    if let Some(dir) = out {
        settings.output_dir = dir;
    }
    let fail_on_critical = strict || settings.fail_on_critical;

    let stamp = run_stamp(Local::now().naive_local());
    let run = run_pipeline(&settings, MovementHistory::disabled())?;
    let outcome = &run.outcome;

    let files = write_results(&settings.output_dir, &stamp, &outcome.stock, &outcome.errors)
        .context("write replay results")?;
    info!(
        stocks = %files.stocks.display(),
        errors = %files.errors.display(),
        "wrote replay results"
    );

    let manifest_path = if settings.write_manifest {
        let mut manifest = RunManifest::new(
            &stamp,
            &loaded.config_hash,
            RunInputs {
                stock_csv: settings.stock_csv.display().to_string(),
                movement_csv: settings.movement_csv.display().to_string(),
            },
            settings.as_of,
            RunOutputs {
                stocks: &files.stocks,
                errors: &files.errors,
            },
        );
        manifest.counts = RunCounts {
            snapshot_lines: run.snapshot_lines as u64,
            snapshot_rejected: run.snapshot_rejected as u64,
            snapshot_duplicates: run.snapshot_duplicates as u64,
            movements_seen: run.summary.seen,
            movements_applied: run.summary.applied,
            movements_finalized: run.summary.finalized,
            movements_ignored: run.summary.ignored,
            movements_rejected: run.summary.rejected,
            errors: outcome.errors.len() as u64,
            critical: outcome.critical,
            lines_before_cleanup: run.lines_before_cleanup as u64,
            lines_after_cleanup: outcome.stock.len() as u64,
        };
        let path = write_manifest(&settings.output_dir, &manifest)?;
        println!("run_id={}", manifest.run_id);
        Some(path)
    } else {
        None
    };

    println!("stamp={}", stamp);
    println!("config_hash={}", loaded.config_hash);
    println!(
        "snapshot lines={} rejected={} duplicates={}",
        run.snapshot_lines, run.snapshot_rejected, run.snapshot_duplicates
    );
    println!(
        "movements seen={} applied={} finalized={} ignored={} rejected={}",
        run.summary.seen,
        run.summary.applied,
        run.summary.finalized,
        run.summary.ignored,
        run.summary.rejected
    );
    println!(
        "cleanup before={} after={}",
        run.lines_before_cleanup,
        outcome.stock.len()
    );
    println!("errors={}", outcome.errors.len());
    println!("critical={}", outcome.critical);
    println!("stocks_path={}", files.stocks.display());
    println!("errors_path={}", files.errors.display());
    if let Some(p) = manifest_path {
        println!("manifest_path={}", p.display());
    }

    if outcome.critical {
        warn!("critical anomalies recorded; review {}", files.errors.display());
        if fail_on_critical {
            bail!(
                "REPLAY_CRITICAL: {} error(s) recorded, critical flag set. Outputs written to {}",
                outcome.errors.len(),
                settings.output_dir.display()
            );
        }
    }

    Ok(())
}

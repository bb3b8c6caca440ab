//! Command handler modules for srk.
//!
//! Settings resolution and the replay pipeline are shared by `replay` and
//! `show`; command-specific output lives in the submodules.

pub mod replay;
pub mod show;

use anyhow::{Context, Result};
use clap::Args;
use srk_config::{
    load_layered_yaml, parse_as_of, report_unused_keys, ConfigMode, LoadedConfig, ReplaySettings,
    UnusedKeyPolicy,
};
use srk_csv::{load_stock_snapshot, MovementStream};
use srk_replay::{replay_stream, MovementHistory, ReplayEngine, ReplayOutcome, ReplaySummary};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Input selection shared by every replaying command. Flags override config.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Layered config paths in merge order
    #[arg(long = "config")]
    pub config_paths: Vec<PathBuf>,

    /// Stock snapshot CSV (overrides input.stock_csv)
    #[arg(long)]
    pub stock: Option<PathBuf>,

    /// Movement journal CSV (overrides input.movement_csv)
    #[arg(long)]
    pub movements: Option<PathBuf>,

    /// Cutoff date YYYY-MM-DD (overrides replay.as_of)
    #[arg(long)]
    pub as_of: Option<String>,
}

pub fn resolve_settings(
    args: &InputArgs,
    mode: ConfigMode,
) -> Result<(ReplaySettings, LoadedConfig)> {
    let loaded = if args.config_paths.is_empty() {
        LoadedConfig::empty()?
    } else {
        load_layered_yaml(args.config_paths.as_slice())?
    };

    let report = report_unused_keys(mode, &loaded.config_json, UnusedKeyPolicy::Warn)?;
    for p in &report.unused_leaf_pointers {
        warn!(mode = %report.mode, pointer = %p, "unused config key");
    }

    let mut settings = ReplaySettings::from_config_json(&loaded.config_json)?;
    if let Some(p) = &args.stock {
        settings.stock_csv = p.clone();
    }
    if let Some(p) = &args.movements {
        settings.movement_csv = p.clone();
    }
    if let Some(d) = &args.as_of {
        settings.as_of = Some(parse_as_of(d).context("--as-of")?);
    }

    Ok((settings, loaded))
}

/// Everything a command needs to report about one replay.
pub struct PipelineRun {
    pub outcome: ReplayOutcome,
    pub summary: ReplaySummary,
    pub history: MovementHistory,
    pub snapshot_lines: usize,
    pub snapshot_rejected: usize,
    pub snapshot_duplicates: usize,
    pub lines_before_cleanup: usize,
}

/// Load the snapshot, replay the journal, clean up.
///
/// A snapshot that cannot be read aborts the run. A journal that cannot be
/// opened is recorded as a critical error and the run continues with the
/// baseline unchanged.
pub fn run_pipeline(settings: &ReplaySettings, history: MovementHistory) -> Result<PipelineRun> {
    info!(
        stock = %settings.stock_csv.display(),
        movements = %settings.movement_csv.display(),
        as_of = ?settings.as_of,
        "starting stock replay"
    );

    let snapshot = load_stock_snapshot(&settings.stock_csv).context("read stock snapshot")?;
    let snapshot_lines = snapshot.lines.len();
    let snapshot_rejected = snapshot.rejected.len();
    let snapshot_duplicates = snapshot.duplicates;

    let mut engine = ReplayEngine::new(snapshot.lines, settings.as_of);
    let mut history = history;

    let summary = match MovementStream::open(&settings.movement_csv) {
        Ok(stream) => replay_stream(&mut engine, stream, &mut history),
        Err(e) => {
            error!(line = %e.line, "{}", e.message);
            let mut summary = ReplaySummary::default();
            summary.record(engine.apply_result(Err(e)));
            summary
        }
    };
    info!(
        seen = summary.seen,
        applied = summary.applied,
        finalized = summary.finalized,
        ignored = summary.ignored,
        rejected = summary.rejected,
        errors = engine.errors().len(),
        critical = engine.has_critical_errors(),
        "processed movements"
    );

    let lines_before_cleanup = engine.stock().len();
    engine.cleanup();
    info!(
        before = lines_before_cleanup,
        after = engine.stock().len(),
        "cleaned up stock lines"
    );

    Ok(PipelineRun {
        outcome: engine.into_outcome(),
        summary,
        history,
        snapshot_lines,
        snapshot_rejected,
        snapshot_duplicates,
        lines_before_cleanup,
    })
}

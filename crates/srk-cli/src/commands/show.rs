//! `srk show`: replay in memory and inspect the result. Writes nothing.

use anyhow::Result;
use srk_config::ConfigMode;
use srk_replay::{filter_lines, MovementHistory, StockFilter};
use srk_schemas::{MovementEvent, StockLine};

use super::{resolve_settings, run_pipeline, InputArgs};

pub struct ShowArgs {
    pub filter: Option<String>,
    pub errors: bool,
    pub history: Option<i64>,
}

pub fn show(input: InputArgs, args: ShowArgs) -> Result<()> {
    let (settings, _) = resolve_settings(&input, ConfigMode::Show)?;

    let history = if args.history.is_some() {
        MovementHistory::new()
    } else {
        MovementHistory::disabled()
    };
    let run = run_pipeline(&settings, history)?;
    let outcome = &run.outcome;

    // The stock table is the default view.
    let show_table = args.filter.is_some() || (!args.errors && args.history.is_none());

    if show_table {
        let filter = StockFilter::new(args.filter.as_deref().unwrap_or(""));
        println!("SEQUENCE\tITEM_NUMBER\tQUANTITY_ON_HAND\tLOCATION\tHANDLING_UNIT\tBATCH1");
        let mut shown = 0usize;
        for line in filter_lines(&outcome.stock, &filter) {
            println!("{}", table_row(line));
            shown += 1;
        }
        println!("lines_shown={} lines_total={}", shown, outcome.stock.len());
    }

    if args.errors {
        println!("TYPE\tMESSAGE\tLINE");
        for e in &outcome.errors {
            println!("{}\t{}\t{}", e.kind, e.message, e.line);
        }
    }

    if let Some(key) = args.history {
        let applied = run.history.for_key(key);
        println!("history key={} movements={}", key, applied.len());
        for ev in applied {
            println!("{}", history_row(ev));
        }
    }

    println!("errors={} critical={}", outcome.errors.len(), outcome.critical);
    Ok(())
}

fn opt(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or("")
}

fn table_row(l: &StockLine) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        l.sequence,
        opt(&l.item),
        l.quantity_on_hand,
        opt(&l.location),
        opt(&l.handling_unit),
        opt(&l.batch1)
    )
}

fn history_row(ev: &MovementEvent) -> String {
    format!(
        "seq={} kind={} change={} total={} location={} date={}",
        ev.sequence,
        ev.kind,
        ev.quantity_change.map(|d| d.to_string()).unwrap_or_default(),
        ev.quantity_total.map(|d| d.to_string()).unwrap_or_default(),
        opt(&ev.location),
        ev.date.map(|d| d.to_string()).unwrap_or_default()
    )
}

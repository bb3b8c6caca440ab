use srk_schemas::{ErrorKind, MovementResult};
use tracing::{debug, warn};

use crate::engine::ReplayEngine;
use crate::history::MovementHistory;
use crate::types::{ApplyOutcome, ReplaySummary};

/// Feed every element of `movements` through `engine`, in order.
///
/// Applied events are recorded in `history`. New error entries are logged as
/// they appear: critical ones at `warn`, quantity mismatches at `debug`.
pub fn replay_stream<I>(
    engine: &mut ReplayEngine,
    movements: I,
    history: &mut MovementHistory,
) -> ReplaySummary
where
    I: IntoIterator<Item = MovementResult>,
{
    let mut summary = ReplaySummary::default();

    for item in movements {
        let kept = if history.is_enabled() {
            item.as_ref().ok().cloned()
        } else {
            None
        };

        let errors_before = engine.errors().len();
        let outcome = engine.apply_result(item);
        summary.record(outcome);

        for e in &engine.errors()[errors_before..] {
            if e.kind == ErrorKind::MovementError {
                debug!(kind = %e.kind, line = %e.line, "{}", e.message);
            } else {
                warn!(kind = %e.kind, line = %e.line, "{}", e.message);
            }
        }

        if outcome == ApplyOutcome::Applied {
            if let Some(ev) = kept {
                history.record(ev);
            }
        }
    }

    summary
}

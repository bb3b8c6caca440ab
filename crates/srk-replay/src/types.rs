use std::collections::BTreeMap;

use srk_schemas::{ErrorEntry, StockLine};

/// Stock map keyed by line sequence. Ordered so output is deterministic.
pub type StockMap = BTreeMap<i64, StockLine>;

/// What `ReplayEngine::apply` did with one stream element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Dispatched on its event kind against the stock map.
    Applied,
    /// Dated before the cutoff; location copied and key frozen.
    Finalized,
    /// Dated before the cutoff for a key that is already frozen.
    IgnoredFinalized,
    /// Parse failure, absent movement, or a quantity outside the decimal
    /// range; recorded as a critical error.
    Rejected,
}

/// Per-run counters returned by `replay_stream`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub seen: u64,
    pub applied: u64,
    pub finalized: u64,
    pub ignored: u64,
    pub rejected: u64,
}

impl ReplaySummary {
    pub fn record(&mut self, outcome: ApplyOutcome) {
        self.seen += 1;
        match outcome {
            ApplyOutcome::Applied => self.applied += 1,
            ApplyOutcome::Finalized => self.finalized += 1,
            ApplyOutcome::IgnoredFinalized => self.ignored += 1,
            ApplyOutcome::Rejected => self.rejected += 1,
        }
    }
}

/// Final state handed to the writer once replay is over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayOutcome {
    pub stock: StockMap,
    pub errors: Vec<ErrorEntry>,
    pub critical: bool,
}

//! Per-symbol sequence tracking
//!
//! The loop never reorders or drops events on account of their sequence
//! number. It only observes gaps (producer loss or queue eviction) and
//! regressions (producer bug) so they show up in logs and stats.

use std::collections::HashMap;
use tracing::{debug, warn};

/// Outcome of observing one sequence number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceCheck {
    /// First event seen for this symbol
    First,
    /// Exactly one past the previous sequence
    InOrder,
    /// Skipped `missing` sequence numbers
    Gap { missing: u64 },
    /// Same as or below the previous sequence
    Regression { last: u64 },
}

#[derive(Debug, Default)]
pub struct SequenceTracker {
    last: HashMap<String, u64>,
    gaps: u64,
    missing: u64,
    regressions: u64,
}

impl SequenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, symbol: &str, sequence: u64) -> SequenceCheck {
        let Some(last) = self.last.get_mut(symbol) else {
            self.last.insert(symbol.to_string(), sequence);
            return SequenceCheck::First;
        };

        let previous = *last;
        if sequence <= previous {
            self.regressions += 1;
            warn!(symbol, sequence, last = previous, "sequence regression");
            return SequenceCheck::Regression { last: previous };
        }

        *last = sequence;
        let missing = sequence - previous - 1;
        if missing == 0 {
            return SequenceCheck::InOrder;
        }

        self.gaps += 1;
        self.missing += missing;
        debug!(symbol, sequence, missing, "sequence gap");
        SequenceCheck::Gap { missing }
    }

    /// Number of gaps observed across all symbols
    pub fn gaps(&self) -> u64 {
        self.gaps
    }

    /// Total sequence numbers skipped across all gaps
    pub fn missing(&self) -> u64 {
        self.missing
    }

    pub fn regressions(&self) -> u64 {
        self.regressions
    }

    pub fn last_sequence(&self, symbol: &str) -> Option<u64> {
        self.last.get(symbol).copied()
    }
}

//! Playout statistics for diagnostics.

use serde::{Deserialize, Serialize};

/// Counters collected while playing out games.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoutStats {
    /// Commands committed.
    pub advances: u32,

    /// Candidates dry-run.
    pub candidates_tried: u32,

    /// Candidates whose dry run failed.
    pub candidates_rejected: u32,

    /// Playouts that reached a terminal state.
    pub completed: u32,
}

impl PlayoutStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fold another set of counters into this one.
    pub fn merge(&mut self, other: &PlayoutStats) {
        self.advances += other.advances;
        self.candidates_tried += other.candidates_tried;
        self.candidates_rejected += other.candidates_rejected;
        self.completed += other.completed;
    }

    /// Share of dry-run candidates that failed.
    #[must_use]
    pub fn rejection_rate(&self) -> f64 {
        if self.candidates_tried == 0 {
            0.0
        } else {
            f64::from(self.candidates_rejected) / f64::from(self.candidates_tried)
        }
    }
}

//! Mutation recording for committed commands.
//!
//! A perform-mode application records every elementary change it makes
//! (`P0.money -5`, `Coal0.flipped true`, ...) so a lineage can be replayed
//! as a readable trace. Dry runs record nothing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of change applied to a field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Change {
    /// Numeric field moved by this amount.
    Delta(i32),
    /// Field set to a new value.
    Set(String),
}

/// One recorded change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    /// Dotted target name, e.g. `P0.money` or `game.coal_market`.
    pub target: String,
    pub change: Change,
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.change {
            Change::Delta(delta) => write!(f, "{} changed by {}", self.target, delta),
            Change::Set(value) => write!(f, "{} changed to {}", self.target, value),
        }
    }
}

/// Collects mutations while a command is applied.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    enabled: bool,
    entries: Vec<Mutation>,
}

impl Recorder {
    /// Create a recorder. A disabled recorder drops everything.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Vec::new(),
        }
    }

    /// Whether changes are being kept.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a numeric change. The target is only built when recording.
    pub fn delta(&mut self, target: impl FnOnce() -> String, delta: i32) {
        if self.enabled {
            self.entries.push(Mutation {
                target: target(),
                change: Change::Delta(delta),
            });
        }
    }

    /// Record a field being set.
    pub fn set(&mut self, target: impl FnOnce() -> String, value: impl fmt::Display) {
        if self.enabled {
            self.entries.push(Mutation {
                target: target(),
                change: Change::Set(value.to_string()),
            });
        }
    }

    /// Recorded mutations so far.
    #[must_use]
    pub fn entries(&self) -> &[Mutation] {
        &self.entries
    }

    /// Consume the recorder, returning its mutations.
    #[must_use]
    pub fn into_entries(self) -> Vec<Mutation> {
        self.entries
    }
}

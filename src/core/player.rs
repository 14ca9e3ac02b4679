//! Player identification and per-player accounts.
//!
//! ## PlayerId
//!
//! Type-safe player identifier; indices are 0-based and double as the
//! player id written in commands.
//!
//! ## PlayerAccount
//!
//! Funds, score, income level and the next buildable tile of every family.
//! All mutators report failures as `ActionError` and leave the offending
//! value in place; the caller discards the whole working copy.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::ActionError;
use super::record::Recorder;
use crate::industry::{IndustryCatalog, IndustryFamily, TileDefinition};

/// Highest income level a player can reach.
pub const MAX_INCOME_LEVEL: i32 = 99;

/// Funds granted by a loan.
pub const LOAN_AMOUNT: i32 = 30;

/// Income levels lost by taking a loan.
pub const LOAN_INCOME_PENALTY: i32 = 3;

/// Display tags handed out in seat order.
pub const PLAYER_TAGS: [&str; 4] = ["red", "blue", "green", "yellow"];

/// Player identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use brass_sim::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(players, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Money earned per round at an income level.
///
/// Levels 0..=10 pay -10..=0; above that each step of income spans two
/// levels, topping out at 11.
///
/// ```
/// use brass_sim::core::player::income_for_level;
///
/// assert_eq!(income_for_level(0), -10);
/// assert_eq!(income_for_level(10), 0);
/// assert_eq!(income_for_level(11), 1);
/// assert_eq!(income_for_level(12), 1);
/// assert_eq!(income_for_level(13), 2);
/// ```
#[must_use]
pub fn income_for_level(level: i32) -> i32 {
    match level {
        i32::MIN..=0 => -10,
        1..=10 => level - 10,
        _ => ((level - 11) / 2 + 1).min(11),
    }
}

/// Mutable per-player ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAccount {
    pub id: PlayerId,
    /// Display tag (seat colour).
    pub tag: String,
    pub funds: i32,
    pub score: i32,
    pub income_level: i32,
    industry_next: [u8; IndustryFamily::COUNT],
}

impl PlayerAccount {
    #[must_use]
    pub fn new(id: PlayerId, tag: impl Into<String>, funds: i32) -> Self {
        Self {
            id,
            tag: tag.into(),
            funds,
            score: 0,
            income_level: 0,
            industry_next: [0; IndustryFamily::COUNT],
        }
    }

    /// Sequence of the next tile this player may build or develop in `family`.
    #[must_use]
    pub fn next_index(&self, family: IndustryFamily) -> u8 {
        self.industry_next[family.index()]
    }

    /// Money earned per round at the current income level.
    #[must_use]
    pub fn income(&self) -> i32 {
        income_for_level(self.income_level)
    }

    /// The next tile of every family that is not yet exhausted, in family order.
    #[must_use]
    pub fn build_options<'a>(&self, catalog: &'a IndustryCatalog) -> Vec<&'a Arc<TileDefinition>> {
        IndustryFamily::ALL
            .iter()
            .filter_map(|&family| catalog.tile(family, self.next_index(family)))
            .collect()
    }

    /// Take `tile` off the player board to build it: the tile must be next
    /// in its family. Advances the family index, then pays the money cost.
    pub fn take_for_build(&mut self, tile: &TileDefinition, rec: &mut Recorder) -> Result<(), ActionError> {
        self.advance_family(tile, rec)?;
        self.adjust_funds(-tile.money_cost, rec)
    }

    /// Remove `tile` from the player board by developing.
    ///
    /// The family index advances before the development restriction is
    /// checked, so a rejected develop still leaves the index moved on the
    /// working copy.
    pub fn take_for_develop(&mut self, tile: &TileDefinition, rec: &mut Recorder) -> Result<(), ActionError> {
        self.advance_family(tile, rec)?;
        if tile.development_restricted {
            return Err(ActionError::DevelopRestricted {
                player: self.id,
                tile: tile.id,
            });
        }
        Ok(())
    }

    fn advance_family(&mut self, tile: &TileDefinition, rec: &mut Recorder) -> Result<(), ActionError> {
        let family = tile.family();
        let expected = self.next_index(family);
        if tile.id.sequence != expected {
            return Err(ActionError::SequenceViolation {
                player: self.id,
                tile: tile.id,
                family,
                expected,
            });
        }
        self.industry_next[family.index()] += 1;
        rec.delta(|| format!("P{}.{}", self.id.0, family), 1);
        Ok(())
    }

    /// Add points; the score floors at 0.
    pub fn award_points(&mut self, points: i32, rec: &mut Recorder) {
        self.score += points;
        rec.delta(|| format!("P{}.score", self.id.0), points);
        if self.score < 0 {
            self.score = 0;
        }
    }

    /// Move the income level. Going below 0 fails; above the top clamps.
    pub fn award_income_levels(&mut self, levels: i32, rec: &mut Recorder) -> Result<(), ActionError> {
        self.income_level += levels;
        rec.delta(|| format!("P{}.income_level", self.id.0), levels);
        if self.income_level < 0 {
            return Err(ActionError::IncomeOutOfRange {
                player: self.id,
                level: self.income_level,
            });
        }
        self.income_level = self.income_level.min(MAX_INCOME_LEVEL);
        Ok(())
    }

    /// Credit or debit funds. A negative balance fails.
    pub fn adjust_funds(&mut self, delta: i32, rec: &mut Recorder) -> Result<(), ActionError> {
        self.funds += delta;
        rec.delta(|| format!("P{}.money", self.id.0), delta);
        if self.funds < 0 {
            return Err(ActionError::InsufficientFunds {
                player: self.id,
                funds: self.funds,
            });
        }
        Ok(())
    }

    /// Take a loan: funds up, income level down.
    pub fn take_loan(&mut self, rec: &mut Recorder) -> Result<(), ActionError> {
        self.adjust_funds(LOAN_AMOUNT, rec)?;
        self.award_income_levels(-LOAN_INCOME_PENALTY, rec)
    }

    /// One-line summary used in state dumps.
    pub(crate) fn summary(&self, catalog: &IndustryCatalog) -> String {
        let next: Vec<String> = IndustryFamily::ALL
            .iter()
            .map(|&family| match catalog.tile(family, self.next_index(family)) {
                Some(tile) => tile.id.to_string(),
                None => format!("{family}-"),
            })
            .collect();
        format!(
            "{} ({}): Funds: {}, Score: {}, Income Level: {} ({:+}), Industry Next: [{}]",
            self.id,
            self.tag,
            self.funds,
            self.score,
            self.income_level,
            self.income(),
            next.join(" ")
        )
    }
}

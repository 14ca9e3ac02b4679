//! Game setup parameters.

use serde::{de, Deserialize, Deserializer, Serialize};

use super::player::PLAYER_TAGS;
use crate::industry::Era;

/// Parameters of a new game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of seated players (1-4).
    #[serde(deserialize_with = "deserialize_player_count")]
    pub player_count: usize,

    /// Funds each player starts with.
    pub starting_funds: i32,

    /// Era the game opens in.
    pub starting_era: Era,

    /// Initial index into the coal price table.
    pub coal_market_level: usize,

    /// Initial index into the iron price table.
    pub iron_market_level: usize,

    /// Round at which the game is over.
    pub final_round: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: 1,
            starting_funds: 36,
            starting_era: Era::Canal,
            coal_market_level: 1,
            iron_market_level: 2,
            final_round: 8,
        }
    }
}

impl GameConfig {
    /// Set the number of players.
    ///
    /// # Panics
    ///
    /// Panics unless `count` is between 1 and 4.
    #[must_use]
    pub fn with_player_count(mut self, count: usize) -> Self {
        assert!(count > 0, "Must have at least 1 player");
        assert!(count <= PLAYER_TAGS.len(), "At most {} players supported", PLAYER_TAGS.len());
        self.player_count = count;
        self
    }

    #[must_use]
    pub fn with_starting_funds(mut self, funds: i32) -> Self {
        self.starting_funds = funds;
        self
    }

    #[must_use]
    pub fn with_era(mut self, era: Era) -> Self {
        self.starting_era = era;
        self
    }

    /// Set both initial market fill levels.
    #[must_use]
    pub fn with_market_levels(mut self, coal: usize, iron: usize) -> Self {
        self.coal_market_level = coal;
        self.iron_market_level = iron;
        self
    }

    #[must_use]
    pub fn with_final_round(mut self, round: u32) -> Self {
        self.final_round = round;
        self
    }
}

fn deserialize_player_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let count = usize::deserialize(deserializer)?;
    if !(1..=PLAYER_TAGS.len()).contains(&count) {
        return Err(de::Error::custom(format!(
            "player_count must be between 1 and {}, got {count}",
            PLAYER_TAGS.len()
        )));
    }
    Ok(count)
}

//! Rules engine trait.
//!
//! A rules engine knows three things about a game:
//! - Which commands are worth trying from a state (`candidates`)
//! - What a command does to a state (`apply`)
//! - When the game is over and who won (`is_terminal`)
//!
//! The playout driver only talks to this trait.

use std::sync::Arc;

use crate::core::action::Command;
use crate::core::error::ActionError;
use crate::core::player::PlayerId;
use crate::core::state::GameState;

/// How a command is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Dry run: nothing is recorded and a failure is an ordinary answer.
    #[default]
    Test,
    /// Commit: mutations are recorded on the child and a failure means the
    /// caller skipped validation.
    Perform,
}

impl Mode {
    /// Whether mutations are recorded in this mode.
    #[must_use]
    pub fn records(self) -> bool {
        matches!(self, Mode::Perform)
    }
}

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Every player finished level.
    Draw,
    /// Several players share the top score.
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Rank players by score.
    #[must_use]
    pub fn from_scores(scores: impl IntoIterator<Item = (PlayerId, i32)>) -> Self {
        let scores: Vec<(PlayerId, i32)> = scores.into_iter().collect();
        let Some(best) = scores.iter().map(|&(_, score)| score).max() else {
            return GameResult::Draw;
        };
        let leaders: Vec<PlayerId> = scores
            .iter()
            .filter(|&&(_, score)| score == best)
            .map(|&(player, _)| player)
            .collect();

        match leaders.as_slice() {
            [only] => GameResult::Winner(*only),
            _ if leaders.len() == scores.len() => GameResult::Draw,
            _ => GameResult::Winners(leaders),
        }
    }

    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
            GameResult::Draw => false,
        }
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `candidates`: May include illegal commands; they are filtered by
///   dry-running them
/// - `apply`: Must not modify `state`; the result links back to it
/// - `is_terminal`: Return `None` while the game continues
pub trait RulesEngine: Send + Sync {
    /// Commands worth trying for the active player. Not checked for legality.
    fn candidates(&self, state: &GameState) -> Vec<Command>;

    /// Apply `command` to a working copy of `state`, producing the child.
    ///
    /// On failure the working copy is dropped.
    fn apply(&self, state: &Arc<GameState>, command: &Command, mode: Mode) -> Result<GameState, ActionError>;

    /// Check if the game is over.
    fn is_terminal(&self, state: &GameState) -> Option<GameResult>;

    // === Convenience Methods ===

    /// Dry-run every candidate and keep the successors that succeeded.
    fn legal_children(&self, state: &Arc<GameState>) -> Vec<GameState> {
        self.candidates(state)
            .iter()
            .filter_map(|command| match self.apply(state, command, Mode::Test) {
                Ok(child) => Some(child),
                Err(err) => {
                    tracing::debug!(%command, %err, "candidate rejected");
                    None
                }
            })
            .collect()
    }
}

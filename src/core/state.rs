//! Game state and its lineage.
//!
//! ## GameState
//!
//! One node of the game tree: turn counters, markets, every player account,
//! and the tiles and links on the board. Mutable collections are `im`
//! vectors, so a child shares structure with its parent and cloning is
//! O(1); the industry catalog and configuration are shared by `Arc`.
//!
//! ## Lineage
//!
//! Every state produced by the engine links back to its parent and records
//! the command that produced it. Walking the parent links reconstructs the
//! history of a playout and lets a search resume from any earlier point.
//!
//! ## Turn order
//!
//! Each player plays two cards per turn, except in the first round where
//! every player plays only one. `advance_card_play` implements this.

use std::fmt;
use std::sync::Arc;

use im::Vector;

use super::action::Command;
use super::config::GameConfig;
use super::error::ActionError;
use super::player::{PlayerAccount, PlayerId, PLAYER_TAGS};
use super::record::{Mutation, Recorder};
use crate::industry::{Era, IndustryCatalog, Market, PlayedIndustry, Resource};

/// A link placed on the board. Routes are not modelled yet, so a link only
/// remembers who built it and when.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayedLink {
    pub owner: PlayerId,
    pub era: Era,
}

/// One node of the game tree.
#[derive(Clone, Debug)]
pub struct GameState {
    catalog: Arc<IndustryCatalog>,
    config: Arc<GameConfig>,

    // === Progression ===
    pub era: Era,
    /// Round counter, from 0.
    pub round: u32,
    /// Total card plays taken in the game.
    pub card_play: u32,
    pub active_player: PlayerId,
    /// Cards the active player has played this turn.
    pub active_player_card: u32,

    // === Board ===
    pub coal_market: Market,
    pub iron_market: Market,
    pub players: Vector<PlayerAccount>,
    pub played_industries: Vector<PlayedIndustry>,
    pub played_links: Vector<PlayedLink>,

    // === Lineage ===
    parent: Option<Arc<GameState>>,
    previous_command: Option<Command>,
    mutations: Vec<Mutation>,
}

impl GameState {
    /// Fresh game: every player at starting funds, active player 0 one card
    /// into the shortened first turn.
    ///
    /// # Panics
    ///
    /// Panics unless `config.player_count` is between 1 and 4.
    #[must_use]
    pub fn new(catalog: Arc<IndustryCatalog>, config: GameConfig) -> Self {
        assert!(
            (1..=PLAYER_TAGS.len()).contains(&config.player_count),
            "player_count must be between 1 and {}, got {}",
            PLAYER_TAGS.len(),
            config.player_count
        );
        let players = PlayerId::all(config.player_count)
            .map(|id| {
                let tag = PLAYER_TAGS[id.index()];
                PlayerAccount::new(id, tag, config.starting_funds)
            })
            .collect();

        Self {
            catalog,
            era: config.starting_era,
            round: 0,
            card_play: 0,
            active_player: PlayerId::new(0),
            active_player_card: 1,
            coal_market: Market::coal(config.coal_market_level),
            iron_market: Market::iron(config.iron_market_level),
            players,
            played_industries: Vector::new(),
            played_links: Vector::new(),
            parent: None,
            previous_command: None,
            mutations: Vec::new(),
            config: Arc::new(config),
        }
    }

    /// Working copy of `parent` that links back to it. The command and
    /// mutations are filled in by the engine.
    #[must_use]
    pub fn child(parent: &Arc<GameState>) -> Self {
        Self {
            parent: Some(Arc::clone(parent)),
            previous_command: None,
            mutations: Vec::new(),
            ..GameState::clone(parent)
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &IndustryCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Get a player's account.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&PlayerAccount> {
        self.players.get(id.index())
    }

    /// Account of the player whose turn it is.
    #[must_use]
    pub fn active_account(&self) -> &PlayerAccount {
        &self.players[self.active_player.index()]
    }

    pub(crate) fn account_mut(&mut self, id: PlayerId) -> &mut PlayerAccount {
        &mut self.players[id.index()]
    }

    /// The market trading `resource`, if any.
    pub fn market_mut(&mut self, resource: Resource) -> Option<&mut Market> {
        match resource {
            Resource::Coal => Some(&mut self.coal_market),
            Resource::Iron => Some(&mut self.iron_market),
            Resource::Beer => None,
        }
    }

    /// Whether the final round has been reached.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.round >= self.config.final_round
    }

    // === Mutation helpers ===

    /// Take one unit off the played tile at `index`, paying its award to
    /// the tile's owner if that flipped it.
    pub fn draw_from_tile(&mut self, index: usize, rec: &mut Recorder) -> Result<(), ActionError> {
        let tile = &mut self.played_industries[index];
        let award = tile.spend_resource()?;
        let (id, owner) = (tile.tile(), tile.owner);
        rec.delta(|| format!("{id}.remaining"), -1);

        if let Some(award) = award {
            rec.set(|| format!("{id}.flipped"), true);
            let account = self.account_mut(owner);
            account.award_points(award.points, rec);
            account.award_income_levels(award.income_levels, rec)?;
        }
        Ok(())
    }

    /// Sell the played tile at `index`, paying its award to the owner.
    pub fn sell_tile(&mut self, index: usize, rec: &mut Recorder) -> Result<(), ActionError> {
        let tile = &mut self.played_industries[index];
        let award = tile.sell()?;
        let (id, owner) = (tile.tile(), tile.owner);
        rec.set(|| format!("{id}.flipped"), true);

        let account = self.account_mut(owner);
        account.award_points(award.points, rec);
        account.award_income_levels(award.income_levels, rec)
    }

    /// Count one successful card play and rotate the turn.
    ///
    /// A player's turn ends after their second card. In the first round
    /// every player gets a single card: the counter restarts at 1 while
    /// fewer card plays than players have been taken.
    pub fn advance_card_play(&mut self, rec: &mut Recorder) {
        self.card_play += 1;
        self.active_player_card += 1;
        rec.delta(|| "game.card_play".to_string(), 1);

        if self.active_player_card >= 2 {
            self.active_player = PlayerId::new(self.active_player.0 + 1);
            self.active_player_card = if (self.card_play as usize) < self.player_count() { 1 } else { 0 };
            rec.set(|| "game.active_player".to_string(), self.active_player.0);
        }
        if self.active_player.index() >= self.player_count() {
            self.active_player = PlayerId::new(0);
            self.round += 1;
            rec.delta(|| "game.round".to_string(), 1);
        }
    }

    // === Lineage ===

    /// The state this one was derived from.
    #[must_use]
    pub fn parent(&self) -> Option<&Arc<GameState>> {
        self.parent.as_ref()
    }

    /// The command that produced this state from its parent.
    #[must_use]
    pub fn previous_command(&self) -> Option<&Command> {
        self.previous_command.as_ref()
    }

    /// Mutations recorded while committing `previous_command`.
    #[must_use]
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Attach the command that produced this state and what it changed.
    pub fn set_origin(&mut self, command: Command, mutations: Vec<Mutation>) {
        self.previous_command = Some(command);
        self.mutations = mutations;
    }

    /// Iterate over ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Arc<GameState>> {
        std::iter::successors(self.parent.as_ref(), |state| state.parent.as_ref())
    }

    /// Number of ancestors.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// The ancestor `k` parent links back. `k` must be at least 1.
    #[must_use]
    pub fn ancestor(&self, k: usize) -> Option<&Arc<GameState>> {
        k.checked_sub(1).and_then(|n| self.ancestors().nth(n))
    }

    /// Nearest ancestor whose card-play counter is `card_play`.
    #[must_use]
    pub fn ancestor_at_card_play(&self, card_play: u32) -> Option<&Arc<GameState>> {
        self.ancestors().find(|state| state.card_play == card_play)
    }

    /// Card-play counter of the root of this lineage.
    #[must_use]
    pub fn root_card_play(&self) -> u32 {
        self.ancestors().last().map_or(self.card_play, |root| root.card_play)
    }

    /// Commands from the root to this state, oldest first.
    #[must_use]
    pub fn command_history(&self) -> Vec<&Command> {
        let mut history: Vec<&Command> = self
            .ancestors()
            .filter_map(|state| state.previous_command.as_ref())
            .collect();
        history.reverse();
        history.extend(self.previous_command.as_ref());
        history
    }

    /// State dump followed by the command chain.
    #[must_use]
    pub fn lineage_report(&self) -> String {
        let mut report = self.to_string();
        report.push_str("\n  Command History:");
        let history = self.command_history();
        if history.is_empty() {
            report.push_str(" None");
        }
        for command in history {
            report.push_str("\n    ");
            report.push_str(&command.to_string());
        }
        report
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.previous_command {
            Some(command) => writeln!(f, "Game State: (Previous command: {command})")?,
            None => writeln!(f, "Game State: (Previous command: None)")?,
        }
        writeln!(
            f,
            "  Round: {}, Card Play: {}, Era: {}, Active Player: {}",
            self.round, self.card_play, self.era, self.active_player.0
        )?;
        writeln!(
            f,
            "  Coal Market Level: {}, Iron Market Level: {}",
            self.coal_market.level(),
            self.iron_market.level()
        )?;
        let links: Vec<String> = self
            .played_links
            .iter()
            .map(|link| format!("P{}-{}", link.owner.0, link.era))
            .collect();
        writeln!(f, "  Played Links: [{}]", links.join(", "))?;
        let tiles: Vec<String> = self.played_industries.iter().map(ToString::to_string).collect();
        writeln!(f, "  Played Industries: [{}]", tiles.join(", "))?;
        write!(f, "  Players:")?;
        for player in &self.players {
            write!(f, "\n    {}", player.summary(&self.catalog))?;
        }
        Ok(())
    }
}

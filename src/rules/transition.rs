//! The Birmingham transition engine.
//!
//! `BrassRules` checks and applies one command to a working copy of a
//! state. Steps run in a fixed order and the first failing step aborts the
//! command; whatever earlier steps changed stays on the working copy, which
//! `apply` then drops.
//!
//! ## Action costs
//!
//! | action          | cost                                                |
//! |-----------------|-----------------------------------------------------|
//! | build           | tile money cost, then its coal/iron cost            |
//! | network (canal) | £3                                                  |
//! | network (rail)  | £5 + coal, or £15 + coal + coal + beer for two links |
//! | develop         | one iron per tile removed                           |
//! | sell            | the tile's beer cost                                |
//! | loan            | none; +£30 and -3 income levels                     |

use std::sync::Arc;

use crate::core::action::{ActionKind, Command, DevelopArg, MainAction, Placement, Token};
use crate::core::error::ActionError;
use crate::core::player::PlayerId;
use crate::core::record::Recorder;
use crate::core::state::{GameState, PlayedLink};
use crate::industry::{Era, PlayedIndustry, Resource, TileDefinition, TileId};

use super::engine::{GameResult, Mode, RulesEngine};
use super::ledger::{market_target, spend_resources};

/// Fee for one canal link.
pub const CANAL_LINK_COST: i32 = 3;

/// Fee for a single rail link.
pub const RAIL_LINK_COST: i32 = 5;

/// Fee for a double rail link.
pub const DOUBLE_RAIL_LINK_COST: i32 = 15;

/// Birmingham rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrassRules;

impl BrassRules {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Apply `command` to `state` in place.
    ///
    /// On `Err` the state may be partially mutated and must be discarded.
    pub fn apply_in_place(&self, state: &mut GameState, command: &Command, rec: &mut Recorder) -> Result<(), ActionError> {
        if command.player != state.active_player {
            return Err(ActionError::OutOfTurn {
                player: command.player,
                active: state.active_player,
            });
        }
        let player = command.player;

        match &command.action {
            MainAction::Build(args) => {
                let placement = single(ActionKind::Build, args.as_slice())?;
                self.build(state, player, placement, rec)?;
            }
            MainAction::Network(args) => self.network(state, player, args.len(), rec)?,
            MainAction::Develop(args) => self.develop(state, player, args, rec)?,
            MainAction::Sell(args) => {
                let placement = single(ActionKind::Sell, args.as_slice())?;
                self.sell(state, player, placement, rec)?;
            }
            MainAction::Loan => state.account_mut(player).take_loan(rec)?,
            MainAction::Scout(_) | MainAction::Pass => {
                return Err(ActionError::Unimplemented {
                    action: command.kind(),
                });
            }
        }

        state.advance_card_play(rec);
        Ok(())
    }

    fn build(&self, state: &mut GameState, player: PlayerId, placement: &Placement, rec: &mut Recorder) -> Result<(), ActionError> {
        let tile = lookup(state, placement.tile)?;

        state.account_mut(player).take_for_build(&tile, rec)?;
        if !tile.era_restriction.permits(state.era) {
            return Err(ActionError::EraMismatch {
                tile: tile.id,
                era: state.era,
            });
        }
        spend_resources(state, player, &placement.resources, &tile.cost_list(), rec)?;

        let index = state.played_industries.len();
        state
            .played_industries
            .push_back(PlayedIndustry::new(player, Arc::clone(&tile), state.era));
        rec.set(|| "game.played_industry".to_string(), tile.id);

        if let Some(resource) = tile.family().market_resource() {
            sell_output_to_market(state, index, resource, rec)?;
        }
        Ok(())
    }

    fn network(&self, state: &mut GameState, player: PlayerId, links: usize, rec: &mut Recorder) -> Result<(), ActionError> {
        match state.era {
            Era::Canal => state.account_mut(player).adjust_funds(-CANAL_LINK_COST, rec)?,
            Era::Rail => match links {
                1 => {
                    state.account_mut(player).adjust_funds(-RAIL_LINK_COST, rec)?;
                    spend_resources(state, player, &[Resource::Coal], &[Resource::Coal], rec)?;
                }
                2 => {
                    state.account_mut(player).adjust_funds(-DOUBLE_RAIL_LINK_COST, rec)?;
                    spend_resources(state, player, &[Resource::Coal], &[Resource::Coal], rec)?;
                    let second = [Resource::Coal, Resource::Beer];
                    spend_resources(state, player, &second, &second, rec)?;
                }
                found => return Err(ActionError::LinkArgumentCount { found }),
            },
        }

        state.played_links.push_back(PlayedLink {
            owner: player,
            era: state.era,
        });
        rec.set(|| "game.played_link".to_string(), state.era);
        Ok(())
    }

    fn develop(&self, state: &mut GameState, player: PlayerId, args: &[DevelopArg], rec: &mut Recorder) -> Result<(), ActionError> {
        if !(1..=2).contains(&args.len()) {
            return Err(ActionError::ArgumentCount {
                action: ActionKind::Develop,
                expected: "1 or 2",
                found: args.len(),
            });
        }
        for arg in args {
            let tile = lookup(state, arg.tile)?;
            state.account_mut(player).take_for_develop(&tile, rec)?;
            spend_resources(state, player, &arg.resources, &[Resource::Iron], rec)?;
        }
        Ok(())
    }

    fn sell(&self, state: &mut GameState, player: PlayerId, placement: &Placement, rec: &mut Recorder) -> Result<(), ActionError> {
        let index = state
            .played_industries
            .iter()
            .position(|played| played.tile() == placement.tile && !played.is_flipped())
            .ok_or(ActionError::NoSuchPlayedTile { tile: placement.tile })?;

        state.sell_tile(index, rec)?;
        let beer = state.played_industries[index].definition().beer_list();
        spend_resources(state, player, &beer, &beer, rec)
    }
}

/// The one argument group of a build or sell.
fn single<T>(action: ActionKind, args: &[T]) -> Result<&T, ActionError> {
    match args {
        [only] => Ok(only),
        _ => Err(ActionError::ArgumentCount {
            action,
            expected: "1",
            found: args.len(),
        }),
    }
}

fn lookup(state: &GameState, tile: TileId) -> Result<Arc<TileDefinition>, ActionError> {
    state
        .catalog()
        .get(tile)
        .cloned()
        .ok_or(ActionError::UnknownTile { tile })
}

/// Move a freshly built mine or works' output into its market while the
/// market has room, paying the owner the price at each level before it
/// steps down.
fn sell_output_to_market(
    state: &mut GameState,
    index: usize,
    resource: Resource,
    rec: &mut Recorder,
) -> Result<(), ActionError> {
    let owner = state.played_industries[index].owner;

    while state.played_industries[index].remaining() > 0 {
        let accepts = state.market_mut(resource).is_some_and(|market| market.accepts_sale());
        if !accepts {
            break;
        }
        state.draw_from_tile(index, rec)?;
        let Some(price) = state.market_mut(resource).and_then(|market| market.sell()) else {
            break;
        };
        rec.delta(|| market_target(resource), -1);
        tracing::trace!(%owner, %resource, price, "sold output to market");
        state.account_mut(owner).adjust_funds(price, rec)?;
    }
    Ok(())
}

impl RulesEngine for BrassRules {
    /// One build per buildable tile with its listed cost as the sources,
    /// one loan, and one sale per unflipped manufactured tile on the board.
    fn candidates(&self, state: &GameState) -> Vec<Command> {
        let player = state.active_player;
        let command = |action| Command::new(state.card_play, player, Token::unknown_card(), action);

        let mut commands: Vec<Command> = state
            .active_account()
            .build_options(state.catalog())
            .into_iter()
            .map(|tile| command(MainAction::build(tile.id, Token::unknown_build_location(), tile.cost_list())))
            .collect();

        commands.push(command(MainAction::Loan));

        commands.extend(
            state
                .played_industries
                .iter()
                .filter(|played| played.definition().is_manufactured() && !played.is_flipped())
                .map(|played| {
                    command(MainAction::sell(
                        played.tile(),
                        Token::unknown_sale_location(),
                        played.definition().beer_list(),
                    ))
                }),
        );
        commands
    }

    fn apply(&self, state: &Arc<GameState>, command: &Command, mode: Mode) -> Result<GameState, ActionError> {
        let mut child = GameState::child(state);
        let mut rec = Recorder::new(mode.records());

        match self.apply_in_place(&mut child, command, &mut rec) {
            Ok(()) => {
                child.set_origin(command.clone(), rec.into_entries());
                Ok(child)
            }
            Err(err) => {
                match mode {
                    Mode::Test => tracing::trace!(%command, %err, "dry run failed"),
                    Mode::Perform => tracing::error!(%command, %err, "committed command failed"),
                }
                Err(err)
            }
        }
    }

    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        if !state.is_terminal() {
            return None;
        }
        Some(GameResult::from_scores(
            state.players.iter().map(|player| (player.id, player.score)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::industry::{IndustryCatalog, IndustryFamily};

    const P0: PlayerId = PlayerId::new(0);

    fn fresh(config: GameConfig) -> GameState {
        let catalog = Arc::new(IndustryCatalog::standard().unwrap());
        GameState::new(catalog, config)
    }

    fn run(state: &mut GameState, text: &str) -> Result<(), ActionError> {
        let command: Command = text.parse().unwrap();
        BrassRules.apply_in_place(state, &command, &mut Recorder::default())
    }

    #[test]
    fn test_out_of_turn() {
        let mut state = fresh(GameConfig::default().with_player_count(2));
        let err = run(&mut state, "0.1.loan.Unknown:").unwrap_err();
        assert_eq!(err, ActionError::OutOfTurn { player: PlayerId::new(1), active: P0 });
    }

    #[test]
    fn test_build_coal_sells_output() {
        let mut state = fresh(GameConfig::default());
        run(&mut state, "0.0.build.Unknown:Coal0.@Unknown0").unwrap();

        let account = state.active_account();
        assert_eq!(account.funds, 36 - 5 + 1);
        assert_eq!(account.next_index(IndustryFamily::Coal), 1);
        assert_eq!(state.played_industries[0].remaining(), 1);
        assert_eq!(state.coal_market.level(), 0);
    }

    #[test]
    fn test_build_coal_into_full_market_keeps_output() {
        let mut state = fresh(GameConfig::default().with_market_levels(0, 2));
        run(&mut state, "0.0.build.Unknown:Coal0.@Unknown0").unwrap();

        assert_eq!(state.played_industries[0].remaining(), 2);
        assert_eq!(state.active_account().funds, 31);
    }

    #[test]
    fn test_iron_works_sells_until_market_is_full() {
        let mut state = fresh(GameConfig::default().with_market_levels(1, 2));
        run(&mut state, "0.0.build.Unknown:Iron0.@Unknown0<Coal>").unwrap();

        // £5 plus one coal at £1, then iron sold at level 2 (£2) and level 1 (£1).
        assert_eq!(state.active_account().funds, 36 - 5 - 1 + 2 + 1);
        assert_eq!(state.iron_market.level(), 0);
        assert_eq!(state.played_industries[0].remaining(), 2);
    }

    #[test]
    fn test_build_out_of_sequence() {
        let mut state = fresh(GameConfig::default());
        let err = run(&mut state, "0.0.build.Unknown:Coal1.@Unknown0").unwrap_err();
        assert!(matches!(err, ActionError::SequenceViolation { expected: 0, .. }));
    }

    #[test]
    fn test_era_mismatch_fails_after_index_advance() {
        let mut state = fresh(GameConfig::default().with_era(Era::Rail));
        let err = run(&mut state, "0.0.build.Unknown:Coal0.@Unknown0").unwrap_err();

        assert!(matches!(err, ActionError::EraMismatch { era: Era::Rail, .. }));
        assert_eq!(state.active_account().next_index(IndustryFamily::Coal), 1);
        assert_eq!(state.active_account().funds, 31);
    }

    #[test]
    fn test_build_with_wrong_sources() {
        let mut state = fresh(GameConfig::default());
        let err = run(&mut state, "0.0.build.Unknown:Crate0.@Unknown0").unwrap_err();
        assert!(matches!(err, ActionError::ResourceShortfall { .. }));
    }

    #[test]
    fn test_build_needs_one_placement() {
        let mut state = fresh(GameConfig::default());
        let err = run(&mut state, "0.0.build.Unknown:Coal0.@A;Crate0.@B<Coal>").unwrap_err();
        assert!(matches!(err, ActionError::ArgumentCount { action: ActionKind::Build, found: 2, .. }));
    }

    #[test]
    fn test_unknown_tile() {
        let mut state = fresh(GameConfig::default());
        let err = run(&mut state, "0.0.build.Unknown:Coal9.@Unknown0").unwrap_err();
        assert_eq!(err, ActionError::UnknownTile { tile: TileId::new(IndustryFamily::Coal, 9) });
    }

    #[test]
    fn test_canal_network_ignores_link_count() {
        let mut state = fresh(GameConfig::default());
        run(&mut state, "0.0.network.Unknown:A.B;B.C;C.D").unwrap();
        assert_eq!(state.active_account().funds, 33);
        assert_eq!(state.played_links.len(), 1);
    }

    #[test]
    fn test_rail_network() {
        let mut state = fresh(GameConfig::default().with_era(Era::Rail));
        run(&mut state, "0.0.network.Unknown:A.B<Coal>").unwrap();
        assert_eq!(state.active_account().funds, 36 - 5 - 1);

        let mut state = fresh(GameConfig::default().with_era(Era::Rail));
        let err = run(&mut state, "0.0.network.Unknown:A.B;B.C").unwrap_err();
        assert_eq!(err, ActionError::UnbuyableResource { player: P0, resource: Resource::Beer });

        let mut state = fresh(GameConfig::default().with_era(Era::Rail));
        let err = run(&mut state, "0.0.network.Unknown:A.B;B.C;C.D").unwrap_err();
        assert_eq!(err, ActionError::LinkArgumentCount { found: 3 });
    }

    #[test]
    fn test_develop_restricted_tile() {
        let mut state = fresh(GameConfig::default());
        let err = run(&mut state, "0.0.develop.Unknown:Pottery0<Iron>").unwrap_err();

        assert!(matches!(err, ActionError::DevelopRestricted { .. }));
        // The index moved before the restriction was checked.
        assert_eq!(state.active_account().next_index(IndustryFamily::Pottery), 1);
    }

    #[test]
    fn test_develop_two_tiles() {
        let mut state = fresh(GameConfig::default());
        run(&mut state, "0.0.develop.Unknown:Crate0<Iron>;Crate1<Iron>").unwrap();

        let account = state.active_account();
        assert_eq!(account.next_index(IndustryFamily::Crate), 2);
        // Iron at levels 2 and 3.
        assert_eq!(account.funds, 36 - 2 - 2);
        assert!(state.played_industries.is_empty());
    }

    #[test]
    fn test_develop_argument_count() {
        let mut state = fresh(GameConfig::default());
        let err = run(&mut state, "0.0.develop.Unknown:").unwrap_err();
        assert!(matches!(err, ActionError::ArgumentCount { action: ActionKind::Develop, found: 0, .. }));
    }

    #[test]
    fn test_sell_requires_played_tile() {
        let mut state = fresh(GameConfig::default());
        let err = run(&mut state, "0.0.sell.Unknown:Crate0.$Unknown0<Beer>").unwrap_err();
        assert!(matches!(err, ActionError::NoSuchPlayedTile { .. }));
    }

    #[test]
    fn test_sell_primary_tile() {
        let mut state = fresh(GameConfig::default());
        run(&mut state, "0.0.build.Unknown:Coal0.@Unknown0").unwrap();
        let err = run(&mut state, "1.0.sell.Unknown:Coal0.$Unknown0").unwrap_err();
        assert!(matches!(err, ActionError::NotSellable { .. }));
    }

    #[test]
    fn test_loan_needs_income() {
        let mut state = fresh(GameConfig::default());
        let err = run(&mut state, "0.0.loan.Unknown:").unwrap_err();
        assert!(matches!(err, ActionError::IncomeOutOfRange { level: -3, .. }));
        // Funds were already credited on the working copy.
        assert_eq!(state.active_account().funds, 66);
    }

    #[test]
    fn test_scout_and_pass_are_unimplemented() {
        let mut state = fresh(GameConfig::default());
        assert_eq!(
            run(&mut state, "0.0.scout.Unknown:A;B").unwrap_err(),
            ActionError::Unimplemented { action: ActionKind::Scout }
        );
        assert_eq!(
            run(&mut state, "0.0.pass.Unknown:").unwrap_err(),
            ActionError::Unimplemented { action: ActionKind::Pass }
        );
    }

    #[test]
    fn test_success_advances_card_play() {
        let mut state = fresh(GameConfig::default());
        run(&mut state, "0.0.build.Unknown:Shed0.@Unknown0").unwrap();
        assert_eq!(state.card_play, 1);
        assert_eq!(state.round, 1);
    }

    #[test]
    fn test_apply_leaves_parent_untouched() {
        let root = Arc::new(fresh(GameConfig::default()));
        let command: Command = "0.0.loan.Unknown:".parse().unwrap();

        assert!(BrassRules.apply(&root, &command, Mode::Test).is_err());
        assert_eq!(root.active_account().funds, 36);
        assert_eq!(root.active_account().income_level, 0);
    }

    #[test]
    fn test_perform_records_mutations() {
        let root = Arc::new(fresh(GameConfig::default()));
        let command: Command = "0.0.build.Unknown:Coal0.@Unknown0".parse().unwrap();

        let tested = BrassRules.apply(&root, &command, Mode::Test).unwrap();
        assert!(tested.mutations().is_empty());
        assert_eq!(tested.previous_command(), Some(&command));

        let child = BrassRules.apply(&root, &command, Mode::Perform).unwrap();
        let trace: Vec<String> = child.mutations().iter().map(ToString::to_string).collect();
        assert!(trace.contains(&"P0.money changed by -5".to_string()));
        assert!(trace.contains(&"game.coal_market changed by -1".to_string()));
        assert!(trace.contains(&"game.played_industry changed to Coal0".to_string()));
        assert!(Arc::ptr_eq(child.parent().unwrap(), &root));
    }

    #[test]
    fn test_fresh_candidates() {
        let state = fresh(GameConfig::default());
        let candidates: Vec<String> = BrassRules.candidates(&state).iter().map(ToString::to_string).collect();

        assert_eq!(
            candidates,
            vec![
                "0.0.build.Unknown:Crate0.@Unknown0<Coal>",
                "0.0.build.Unknown:Shed0.@Unknown0",
                "0.0.build.Unknown:Pottery0.@Unknown0<Iron>",
                "0.0.build.Unknown:Beer0.@Unknown0<Iron>",
                "0.0.build.Unknown:Iron0.@Unknown0<Coal>",
                "0.0.build.Unknown:Coal0.@Unknown0",
                "0.0.loan.Unknown:",
            ]
        );
    }

    #[test]
    fn test_terminal_result() {
        let mut state = fresh(GameConfig::default().with_final_round(1));
        assert!(BrassRules.is_terminal(&state).is_none());
        run(&mut state, "0.0.build.Unknown:Shed0.@Unknown0").unwrap();
        assert_eq!(BrassRules.is_terminal(&state), Some(GameResult::Winner(P0)));
    }
}

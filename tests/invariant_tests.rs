//! Invariants that hold on every state of any playout.

use std::sync::Arc;

use brass_sim::core::player::MAX_INCOME_LEVEL;
use brass_sim::industry::IndustryCatalog;
use brass_sim::playout::{Playout, PlayoutConfig};
use brass_sim::rules::{BrassRules, RulesEngine};
use brass_sim::{GameConfig, GameState, PlayoutError};
use proptest::prelude::*;

/// Advance until terminal or stuck. Any other failure is returned.
fn walk(seed: u64, config: GameConfig) -> Result<Arc<GameState>, PlayoutError> {
    let catalog = Arc::new(IndustryCatalog::standard().unwrap());
    let mut state = Arc::new(GameState::new(catalog, config));
    let mut driver = Playout::new(BrassRules, PlayoutConfig::default().with_seed(seed));

    while BrassRules.is_terminal(&state).is_none() {
        match driver.advance(&state) {
            Ok(next) => state = next,
            Err(PlayoutError::Stuck { .. }) => break,
            Err(err) => return Err(err),
        }
    }
    Ok(state)
}

fn check(state: &GameState) -> Result<(), TestCaseError> {
    for player in &state.players {
        prop_assert!(player.funds >= 0, "{}", state);
        prop_assert!(player.score >= 0, "{}", state);
        prop_assert!((0..=MAX_INCOME_LEVEL).contains(&player.income_level), "{}", state);
    }
    for tile in &state.played_industries {
        prop_assert!(!tile.is_flipped() || tile.remaining() == 0);
    }
    prop_assert!(state.coal_market.level() < state.coal_market.prices().len());
    prop_assert!(state.iron_market.level() < state.iron_market.prices().len());
    prop_assert!(state.active_player.index() < state.player_count());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_states_stay_in_range(seed in any::<u64>(), players in 1usize..=4, funds in 0i32..80) {
        let end = walk(seed, GameConfig::default().with_player_count(players).with_starting_funds(funds));
        // A command that passed its dry run always commits.
        let end = end.map_err(|err| TestCaseError::fail(err.to_string()))?;

        check(&end)?;
        for state in end.ancestors() {
            check(state)?;
        }
    }

    #[test]
    fn prop_flipped_tiles_stay_flipped(seed in any::<u64>()) {
        let end = walk(seed, GameConfig::default().with_player_count(2).with_starting_funds(200))
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        let mut later: &GameState = &end;
        for earlier in end.ancestors() {
            for (before, after) in earlier.played_industries.iter().zip(later.played_industries.iter()) {
                prop_assert_eq!(before.tile(), after.tile());
                prop_assert!(!before.is_flipped() || after.is_flipped());
                prop_assert!(after.remaining() <= before.remaining());
            }
            later = earlier;
        }
    }
}

//! Playout driver integration tests.

use std::sync::Arc;

use brass_sim::industry::IndustryCatalog;
use brass_sim::playout::{FirstLegal, Playout, PlayoutConfig};
use brass_sim::rules::{BrassRules, RulesEngine};
use brass_sim::{GameConfig, GameState, PlayoutError};

fn root(config: GameConfig) -> Arc<GameState> {
    let catalog = Arc::new(IndustryCatalog::standard().unwrap());
    Arc::new(GameState::new(catalog, config))
}

/// Funds no sequence of builds can exhaust.
fn rich(players: usize) -> GameConfig {
    GameConfig::default().with_player_count(players).with_starting_funds(1_000)
}

fn seeded(seed: u64) -> Playout<BrassRules> {
    Playout::new(BrassRules, PlayoutConfig::default().with_seed(seed))
}

// =============================================================================
// Completion
// =============================================================================

#[test]
fn test_completion_length_per_player_count() {
    for players in 1..=4 {
        let end = seeded(players as u64).play_to_completion(root(rich(players))).unwrap();

        // One card each in round 0, then two each for rounds 1 to 7.
        assert_eq!(end.card_play as usize, 15 * players, "{players} players");
        assert_eq!(end.round, 8);
        assert!(BrassRules.is_terminal(&end).is_some());
    }
}

#[test]
fn test_committed_states_record_mutations() {
    let end = seeded(21).play_to_completion(root(rich(2))).unwrap();

    assert!(!end.mutations().is_empty());
    for state in end.ancestors().filter(|state| state.parent().is_some()) {
        assert!(!state.mutations().is_empty());
        assert!(state.previous_command().is_some());
    }
}

#[test]
fn test_lineage_is_consistent() {
    let end = seeded(5).play_to_completion(root(rich(3))).unwrap();

    let mut child: &GameState = &end;
    for parent in end.ancestors() {
        assert_eq!(parent.card_play + 1, child.card_play);
        let command = child.previous_command().unwrap();
        assert_eq!(command.card_play, parent.card_play);
        assert_eq!(command.player, parent.active_player);
        child = parent;
    }
}

#[test]
fn test_policies_reach_the_end() {
    let start = root(rich(2));

    let first = seeded(1).with_selection(FirstLegal).play_to_completion(Arc::clone(&start)).unwrap();
    let uniform = seeded(1).play_to_completion(start).unwrap();

    assert_eq!(first.round, 8);
    assert_eq!(uniform.round, 8);
}

#[test]
fn test_default_funds_single_player_ends_or_sticks() {
    for seed in 0..16 {
        match seeded(seed).play_to_completion(root(GameConfig::default())) {
            Ok(end) => {
                assert_eq!(end.round, 8, "seed {seed}");
                assert_eq!(end.card_play, 15, "seed {seed}");
                assert!(BrassRules.is_terminal(&end).is_some());
            }
            Err(PlayoutError::Stuck { round, card_play }) => {
                assert!(round < 8, "seed {seed}");
                assert!(card_play < 15, "seed {seed}");
            }
            Err(other) => panic!("seed {seed}: unexpected {other}"),
        }
    }
}

#[test]
fn test_stuck_is_reported() {
    let err = seeded(0)
        .play_to_completion(root(GameConfig::default().with_starting_funds(0)))
        .unwrap_err();
    assert!(matches!(err, PlayoutError::Stuck { round: 0, card_play: 0 }));
}

// =============================================================================
// Re-exploration
// =============================================================================

#[test]
fn test_resume_keeps_the_prefix() {
    let mut driver = seeded(31);
    let end = driver.play_to_completion(root(rich(2))).unwrap();

    let fork = driver.resume_from_ancestor(&end, 10).unwrap();
    assert_eq!(fork.card_play, end.card_play - 10);

    let other = driver.play_to_completion(Arc::clone(&fork)).unwrap();
    let prefix = fork.command_history();
    assert_eq!(&other.command_history()[..prefix.len()], &prefix[..]);
    assert_eq!(other.card_play, end.card_play);
}

#[test]
fn test_prune_and_complete_replays_from_earlier_card_play() {
    let mut driver = seeded(17);
    let start = root(rich(1));
    let end = driver.play_to_completion(Arc::clone(&start)).unwrap();

    for _ in 0..5 {
        let again = driver.prune_and_complete(&end).unwrap();
        assert_eq!(again.round, 8);
        assert!(Arc::ptr_eq(again.ancestors().last().unwrap(), &start));
    }
    assert_eq!(driver.stats().completed, 6);
}

#[test]
fn test_play_many() {
    let mut driver = Playout::new(BrassRules, PlayoutConfig::default().with_seed(3));
    let start = root(rich(2));

    let finals = driver.play_many(&start, 8).unwrap();
    assert_eq!(finals.len(), 8);
    assert!(finals.iter().all(|end| end.round == 8));
    assert_eq!(driver.stats().completed, 8);
    assert_eq!(driver.stats().advances, 8 * 30);
}

//! Random playout driver.
//!
//! Each step lists the active player's candidates, dry-runs them into the
//! legal children, lets the selection policy pick one and re-applies that
//! command in perform mode so the committed child carries its mutations.

use std::sync::Arc;

use rayon::prelude::*;

use crate::core::{Command, GameRng, GameRngState, GameState, PlayoutError};
use crate::rules::{Mode, RulesEngine};

use super::config::PlayoutConfig;
use super::policy::{ChildSelection, UniformSelection};
use super::stats::PlayoutStats;

/// Plays games forward from a state until the engine reports them over.
pub struct Playout<E: RulesEngine> {
    engine: E,
    selection: Arc<dyn ChildSelection>,
    rng: GameRng,
    config: PlayoutConfig,
    stats: PlayoutStats,
}

impl<E: RulesEngine> Playout<E> {
    /// Uniformly random playouts.
    pub fn new(engine: E, config: PlayoutConfig) -> Self {
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        Self {
            engine,
            selection: Arc::new(UniformSelection),
            rng,
            config,
            stats: PlayoutStats::default(),
        }
    }

    /// Replace the child selection policy.
    #[must_use]
    pub fn with_selection(mut self, selection: impl ChildSelection + 'static) -> Self {
        self.selection = Arc::new(selection);
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &PlayoutConfig {
        &self.config
    }

    pub fn stats(&self) -> &PlayoutStats {
        &self.stats
    }

    /// Capture the RNG position, e.g. to replay a playout later.
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// Commands worth trying for the active player. Not checked for legality.
    pub fn enumerate_candidates(&self, state: &GameState) -> Vec<Command> {
        self.engine.candidates(state)
    }

    /// Dry-run every candidate and keep the successors that succeeded.
    pub fn legal_children(&mut self, state: &Arc<GameState>) -> Vec<GameState> {
        self.screen(state).into_iter().map(|(_, child)| child).collect()
    }

    fn screen(&mut self, state: &Arc<GameState>) -> Vec<(Command, GameState)> {
        let candidates = self.engine.candidates(state);
        let tried = candidates.len();

        let legal: Vec<(Command, GameState)> = candidates
            .into_iter()
            .filter_map(|command| match self.engine.apply(state, &command, Mode::Test) {
                Ok(child) => Some((command, child)),
                Err(err) => {
                    tracing::debug!(%command, %err, "candidate rejected");
                    None
                }
            })
            .collect();

        self.stats.candidates_tried += tried as u32;
        self.stats.candidates_rejected += (tried - legal.len()) as u32;
        legal
    }

    /// Commit one legal child picked by the selection policy.
    pub fn advance(&mut self, state: &Arc<GameState>) -> Result<Arc<GameState>, PlayoutError> {
        let (mut commands, children): (Vec<Command>, Vec<GameState>) = self.screen(state).into_iter().unzip();

        let index = self
            .selection
            .select(&children, &mut self.rng)
            .filter(|&index| index < commands.len())
            .ok_or(PlayoutError::Stuck {
                round: state.round,
                card_play: state.card_play,
            })?;
        let command = commands.swap_remove(index);

        tracing::debug!(%command, "committing");
        let child = self
            .engine
            .apply(state, &command, Mode::Perform)
            .map_err(|source| PlayoutError::Commit {
                command: command.to_string(),
                source,
            })?;
        self.stats.advances += 1;
        Ok(Arc::new(child))
    }

    /// Advance until the engine reports the game over.
    pub fn play_to_completion(&mut self, state: Arc<GameState>) -> Result<Arc<GameState>, PlayoutError> {
        tracing::info!(round = state.round, card_play = state.card_play, "playout started");

        let mut state = state;
        while self.engine.is_terminal(&state).is_none() {
            state = self.advance(&state)?;
        }

        self.stats.completed += 1;
        tracing::info!(round = state.round, card_play = state.card_play, "playout finished");
        Ok(state)
    }

    /// The ancestor `k` parent links back from `state`, as a root for new
    /// playouts. `k = 0` is `state` itself.
    pub fn resume_from_ancestor(&self, state: &Arc<GameState>, k: usize) -> Result<Arc<GameState>, PlayoutError> {
        if k == 0 {
            return Ok(Arc::clone(state));
        }
        state
            .ancestor(k)
            .cloned()
            .ok_or_else(|| PlayoutError::AncestorOutOfRange {
                requested: k,
                depth: state.depth(),
            })
    }

    /// Cut the lineage back to a random earlier card play and play a fresh
    /// future from there.
    pub fn prune_and_complete(&mut self, state: &Arc<GameState>) -> Result<Arc<GameState>, PlayoutError> {
        let first = state.root_card_play();
        if state.card_play <= first {
            return Err(PlayoutError::EmptyHistory);
        }
        let cut = self.rng.gen_range_u32(first..state.card_play);
        let ancestor = state
            .ancestor_at_card_play(cut)
            .cloned()
            .ok_or(PlayoutError::EmptyHistory)?;

        tracing::debug!(cut, "pruned lineage");
        self.play_to_completion(ancestor)
    }
}

impl<E: RulesEngine + Clone> Playout<E> {
    /// Run `count` independent playouts from `root`, each with its own
    /// forked RNG. Results come back in fork order whatever the thread
    /// count, and the workers' counters are merged into this driver's.
    pub fn play_many(&mut self, root: &Arc<GameState>, count: usize) -> Result<Vec<Arc<GameState>>, PlayoutError> {
        let workers: Vec<Playout<E>> = (0..count)
            .map(|_| Playout {
                engine: self.engine.clone(),
                selection: Arc::clone(&self.selection),
                rng: self.rng.fork(),
                config: self.config.clone(),
                stats: PlayoutStats::default(),
            })
            .collect();

        let run = |mut worker: Playout<E>| {
            let result = worker.play_to_completion(Arc::clone(root));
            (result, worker.stats)
        };

        let outcomes: Vec<(Result<Arc<GameState>, PlayoutError>, PlayoutStats)> = match self.config.fan_out {
            0 => workers.into_par_iter().map(run).collect(),
            1 => workers.into_iter().map(run).collect(),
            threads => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|err| PlayoutError::ThreadPool(err.to_string()))?;
                pool.install(|| workers.into_par_iter().map(run).collect())
            }
        };

        let mut finals = Vec::with_capacity(outcomes.len());
        for (result, stats) in outcomes {
            self.stats.merge(&stats);
            finals.push(result);
        }
        finals.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::industry::IndustryCatalog;
    use crate::playout::policy::FirstLegal;
    use crate::rules::BrassRules;

    fn root(config: GameConfig) -> Arc<GameState> {
        let catalog = Arc::new(IndustryCatalog::standard().unwrap());
        Arc::new(GameState::new(catalog, config))
    }

    /// Enough money that no build can be refused.
    fn rich() -> GameConfig {
        GameConfig::default().with_starting_funds(1_000)
    }

    fn playout(seed: u64) -> Playout<BrassRules> {
        Playout::new(BrassRules, PlayoutConfig::default().with_seed(seed))
    }

    #[test]
    fn test_legal_children_counts() {
        let mut driver = playout(1);
        let root = root(GameConfig::default());

        assert_eq!(driver.enumerate_candidates(&root).len(), 7);
        assert_eq!(driver.legal_children(&root).len(), 6);
        assert_eq!(driver.stats().candidates_tried, 7);
        assert_eq!(driver.stats().candidates_rejected, 1);
    }

    #[test]
    fn test_advance_commits_with_mutations() {
        let mut driver = playout(2).with_selection(FirstLegal);
        let root = root(GameConfig::default());

        let child = driver.advance(&root).unwrap();
        assert!(Arc::ptr_eq(child.parent().unwrap(), &root));
        assert_eq!(child.previous_command().unwrap().to_string(), "0.0.build.Unknown:Crate0.@Unknown0<Coal>");
        assert!(!child.mutations().is_empty());
        assert_eq!(driver.stats().advances, 1);
    }

    #[test]
    fn test_play_to_completion_single_player() {
        let mut driver = playout(3);
        let end = driver.play_to_completion(root(rich())).unwrap();

        assert_eq!(end.round, 8);
        assert_eq!(end.card_play, 15);
        assert_eq!(end.depth(), 15);
        assert_eq!(end.command_history().len(), 15);
        assert_eq!(driver.stats().completed, 1);
    }

    #[test]
    fn test_same_seed_same_game() {
        let start = root(rich().with_player_count(2));
        let a = playout(11).play_to_completion(Arc::clone(&start)).unwrap();
        let b = playout(11).play_to_completion(start).unwrap();

        let history = |state: &GameState| -> Vec<String> {
            state.command_history().iter().map(ToString::to_string).collect()
        };
        assert_eq!(history(&a), history(&b));
    }

    #[test]
    fn test_stuck_state() {
        let mut driver = playout(4);
        // No money: every build fails, and the loan fails at income 0.
        let start = root(GameConfig::default().with_starting_funds(0));

        let err = driver.play_to_completion(start).unwrap_err();
        assert_eq!(err, PlayoutError::Stuck { round: 0, card_play: 0 });
    }

    #[test]
    fn test_resume_from_ancestor() {
        let driver = playout(5);
        let start = root(rich());
        let end = playout(5).play_to_completion(Arc::clone(&start)).unwrap();

        assert!(Arc::ptr_eq(&driver.resume_from_ancestor(&end, 0).unwrap(), &end));
        assert_eq!(driver.resume_from_ancestor(&end, 4).unwrap().card_play, 11);
        assert!(Arc::ptr_eq(&driver.resume_from_ancestor(&end, 15).unwrap(), &start));
        assert_eq!(
            driver.resume_from_ancestor(&end, 16).unwrap_err(),
            PlayoutError::AncestorOutOfRange { requested: 16, depth: 15 }
        );
    }

    #[test]
    fn test_prune_and_complete() {
        let mut driver = playout(6);
        let start = root(rich());

        assert_eq!(driver.prune_and_complete(&start).unwrap_err(), PlayoutError::EmptyHistory);

        let end = driver.play_to_completion(Arc::clone(&start)).unwrap();
        let again = driver.prune_and_complete(&end).unwrap();
        assert_eq!(again.round, 8);
        assert_eq!(again.depth(), 15);
        // The new future hangs off the same root.
        assert!(Arc::ptr_eq(again.ancestors().last().unwrap(), &start));
    }

    #[test]
    fn test_play_many_is_thread_independent() {
        let start = root(rich().with_player_count(3));
        let history = |states: &[Arc<GameState>]| -> Vec<Vec<String>> {
            states
                .iter()
                .map(|s| s.command_history().iter().map(ToString::to_string).collect())
                .collect()
        };

        let mut sequential = Playout::new(BrassRules, PlayoutConfig::default().with_seed(8).with_fan_out(1));
        let mut parallel = Playout::new(BrassRules, PlayoutConfig::default().with_seed(8).with_fan_out(3));

        let a = sequential.play_many(&start, 4).unwrap();
        let b = parallel.play_many(&start, 4).unwrap();

        assert_eq!(a.len(), 4);
        assert_eq!(history(&a), history(&b));
        assert_eq!(sequential.stats().completed, 4);
        assert_eq!(sequential.stats(), parallel.stats());
    }
}

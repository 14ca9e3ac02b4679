//! Child selection policies.
//!
//! The driver screens candidates into legal children, then asks a
//! `ChildSelection` which one to commit.

use crate::core::{GameRng, GameState};

/// Policy for choosing which legal child to commit.
pub trait ChildSelection: Send + Sync {
    /// Index into `children`, or `None` when there is nothing to choose.
    fn select(&self, children: &[GameState], rng: &mut GameRng) -> Option<usize>;
}

/// Uniformly random choice.
#[derive(Clone, Debug, Default)]
pub struct UniformSelection;

impl ChildSelection for UniformSelection {
    fn select(&self, children: &[GameState], rng: &mut GameRng) -> Option<usize> {
        if children.is_empty() {
            return None;
        }
        Some(rng.gen_range_usize(0..children.len()))
    }
}

/// Always the first legal child, in candidate order.
#[derive(Clone, Debug, Default)]
pub struct FirstLegal;

impl ChildSelection for FirstLegal {
    fn select(&self, children: &[GameState], _rng: &mut GameRng) -> Option<usize> {
        (!children.is_empty()).then_some(0)
    }
}

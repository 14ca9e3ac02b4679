//! # brass-sim
//!
//! A rules engine and random-playout simulator for an industrial-era
//! network-building board game in the style of Brass: Birmingham.
//!
//! ## Design Principles
//!
//! 1. **Copy, then mutate**: A command never touches the state it is applied
//!    to. The engine works on a child copy that links back to its parent, so
//!    every state is a node of a game tree.
//!
//! 2. **Dry run before commit**: The same code path validates (`Mode::Test`)
//!    and commits (`Mode::Perform`); only perform mode records mutations.
//!
//! 3. **Data-driven tiles**: Industry tiles come from a CSV catalog loaded
//!    once and shared read-only by every state.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: Player accounts and board tiles live in
//!   `im::Vector`, so children share structure with their parents.
//!
//! - **Deterministic Randomness**: Playouts draw from a seeded ChaCha RNG and
//!   fork it for parallel batches.
//!
//! ## Modules
//!
//! - `core`: Players, commands and their text form, state, errors, RNG, configuration
//! - `industry`: Tile catalog, played tiles, resource markets
//! - `rules`: `RulesEngine` trait, resource ledger, the Birmingham transition engine
//! - `playout`: Candidate enumeration and random playouts

pub mod core;
pub mod industry;
pub mod playout;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    ActionError, ActionKind, CatalogError, Command, GameConfig, GameRng, GameRngState, GameState, MainAction,
    ParseError, PlayerAccount, PlayerId, PlayoutError, Token,
};

pub use crate::industry::{Era, IndustryCatalog, IndustryFamily, Market, PlayedIndustry, Resource, TileDefinition, TileId};

pub use crate::rules::{BrassRules, GameResult, Mode, RulesEngine};

pub use crate::playout::{ChildSelection, Playout, PlayoutConfig, PlayoutStats, UniformSelection};

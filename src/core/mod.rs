//! Core engine types: players, commands, state, errors, RNG, configuration.
//!
//! Everything the transition engine reads or writes lives here. Rules
//! (what a command does) live in `rules`; search lives in `playout`.

pub mod action;
pub mod config;
pub mod error;
pub mod notation;
pub mod player;
pub mod record;
pub mod rng;
pub mod state;

pub use action::{ActionKind, Command, DevelopArg, LinkArg, MainAction, Placement, Token};
pub use config::GameConfig;
pub use error::{ActionError, CatalogError, ParseError, PlayoutError};
pub use player::{PlayerAccount, PlayerId};
pub use record::{Change, Mutation, Recorder};
pub use rng::{GameRng, GameRngState};
pub use state::{GameState, PlayedLink};

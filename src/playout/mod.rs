//! Random playouts over the game tree.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use brass_sim::core::{GameConfig, GameState};
//! use brass_sim::industry::IndustryCatalog;
//! use brass_sim::playout::{Playout, PlayoutConfig};
//! use brass_sim::rules::BrassRules;
//!
//! let catalog = Arc::new(IndustryCatalog::standard().unwrap());
//! let root = Arc::new(GameState::new(catalog, GameConfig::default().with_starting_funds(1_000)));
//!
//! let mut playout = Playout::new(BrassRules, PlayoutConfig::default().with_seed(42));
//! let end = playout.play_to_completion(root).unwrap();
//!
//! assert_eq!(end.round, 8);
//! for command in end.command_history() {
//!     println!("{command}");
//! }
//! ```

pub mod config;
pub mod driver;
pub mod policy;
pub mod stats;

pub use config::PlayoutConfig;
pub use driver::Playout;
pub use policy::{ChildSelection, FirstLegal, UniformSelection};
pub use stats::PlayoutStats;

//! Game rules.
//!
//! - `engine`: the `RulesEngine` trait the playout driver talks to
//! - `ledger`: paying resource costs from the board or the markets
//! - `transition`: `BrassRules`, the Birmingham transition engine
//!
//! Nothing outside this module interprets actions.

pub mod engine;
pub mod ledger;
pub mod transition;

pub use engine::{GameResult, Mode, RulesEngine};
pub use ledger::spend_resources;
pub use transition::BrassRules;

//! Error types for the engine, the command grammar, catalog loading and playouts.
//!
//! ## Recoverable vs fatal
//!
//! `ActionError` is the only recoverable failure: a dry run that fails simply
//! discards its working copy. Everything else (`ParseError`, `CatalogError`,
//! `PlayoutError`) aborts the operation that raised it.

use thiserror::Error;

use super::action::ActionKind;
use super::player::PlayerId;
use crate::industry::{Era, IndustryFamily, Resource, TileId};

/// Why a command was rejected by the transition engine.
///
/// The working copy a command was applied to may already carry partial
/// mutations when one of these is returned; callers must discard it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{player} cannot act during {active}'s turn")]
    OutOfTurn { player: PlayerId, active: PlayerId },

    #[error("{player} cannot take {tile} yet: next {family} tile is sequence {expected}")]
    SequenceViolation {
        player: PlayerId,
        tile: TileId,
        family: IndustryFamily,
        expected: u8,
    },

    #[error("{player} cannot develop {tile}: tile is development-restricted")]
    DevelopRestricted { player: PlayerId, tile: TileId },

    #[error("{tile} cannot be built in the {era} era")]
    EraMismatch { tile: TileId, era: Era },

    #[error("{player} cannot have negative funds ({funds})")]
    InsufficientFunds { player: PlayerId, funds: i32 },

    #[error("{player} cannot have a negative income level ({level})")]
    IncomeOutOfRange { player: PlayerId, level: i32 },

    #[error("{player} spent {spent:?} but was required to spend {required:?}")]
    ResourceShortfall {
        player: PlayerId,
        spent: Vec<Resource>,
        required: Vec<Resource>,
    },

    #[error("{player} cannot buy {resource}: no board supply and no market")]
    UnbuyableResource { player: PlayerId, resource: Resource },

    #[error("{tile} is already flipped or exhausted")]
    TileExhausted { tile: TileId },

    #[error("{tile} is not a manufactured industry and cannot be sold")]
    NotSellable { tile: TileId },

    #[error("no unflipped {tile} on the board")]
    NoSuchPlayedTile { tile: TileId },

    #[error("a rail network play takes 1 or 2 links, got {found}")]
    LinkArgumentCount { found: usize },

    #[error("{action} takes {expected} argument group(s), got {found}")]
    ArgumentCount {
        action: ActionKind,
        expected: &'static str,
        found: usize,
    },

    #[error("{tile} is not in the industry catalog")]
    UnknownTile { tile: TileId },

    #[error("{action} is not implemented")]
    Unimplemented { action: ActionKind },
}

/// Malformed command text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected exactly one ':' in {0:?}")]
    MissingSeparator(String),

    #[error("expected <cardPlay>.<playerId>.<action>.<card> header, got {0:?}")]
    MalformedHeader(String),

    #[error("invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("unknown action kind {0:?}")]
    UnknownAction(String),

    #[error("malformed argument {argument:?} for {action}")]
    MalformedArgument { action: ActionKind, argument: String },

    #[error("malformed resource suffix in {0:?}")]
    MalformedResources(String),

    #[error("unknown resource {0:?}")]
    UnknownResource(String),

    #[error("invalid tile name {0:?}")]
    InvalidTile(String),

    #[error("{action} takes no arguments, got {argument:?}")]
    UnexpectedArgument { action: ActionKind, argument: String },

    #[error("invalid name {0:?}: must be non-empty and free of . : ; < > ,")]
    InvalidToken(String),
}

/// Failure while loading the industry catalog. Always fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog row error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown industry family {0:?}")]
    UnknownFamily(String),

    #[error("unknown age restriction {0:?}")]
    UnknownRestriction(String),

    #[error("duplicate catalog entry {0}")]
    DuplicateTile(TileId),

    #[error("{family} sequences must be contiguous from 0: expected {expected}, found {found}")]
    NonContiguous {
        family: IndustryFamily,
        expected: u8,
        found: u8,
    },
}

/// Failure of the playout driver.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlayoutError {
    #[error("no legal successors at round {round}, card play {card_play}")]
    Stuck { round: u32, card_play: u32 },

    #[error("committing {command} failed: {source}")]
    Commit {
        command: String,
        #[source]
        source: ActionError,
    },

    #[error("cannot walk back {requested} states from a lineage of depth {depth}")]
    AncestorOutOfRange { requested: usize, depth: usize },

    #[error("no earlier card play to resume from")]
    EmptyHistory,

    #[error("could not start playout workers: {0}")]
    ThreadPool(String),
}

//! Structured commands: card play + player + action kind + typed arguments.
//!
//! A `Command` is the decoded form of one line of command text (see
//! `core::notation` for the encoding). The action is a closed enum so the
//! transition engine matches every kind exhaustively.
//!
//! ## Example
//!
//! ```
//! use brass_sim::core::{Command, MainAction, PlayerId, Token};
//! use brass_sim::industry::{IndustryFamily, Resource, TileId};
//!
//! let cmd = Command::new(
//!     3,
//!     PlayerId::new(0),
//!     Token::unknown_card(),
//!     MainAction::build(TileId::new(IndustryFamily::Crate, 0), Token::new("@Birmingham").unwrap(), [Resource::Coal]),
//! );
//! assert_eq!(cmd.to_string(), "3.0.build.Unknown:Crate0.@Birmingham<Coal>");
//!
//! // Names can never carry a separator of the text form.
//! assert!(Token::new("Wild.Card").is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum::{Display, EnumIter, EnumString};

use super::error::ParseError;
use super::player::PlayerId;
use crate::industry::{Resource, ResourceList, TileId};

/// Placeholder card token until card hands are modelled.
pub const UNKNOWN_CARD: &str = "Unknown";

/// Placeholder build location until a map exists.
pub const UNKNOWN_BUILD_LOCATION: &str = "@Unknown0";

/// Placeholder sale location until a map exists.
pub const UNKNOWN_SALE_LOCATION: &str = "$Unknown0";

/// Characters that delimit fields in command text.
pub const SEPARATORS: [char; 6] = ['.', ':', ';', '<', '>', ','];

/// A card, location or scout-card name.
///
/// Never empty and never contains one of the `SEPARATORS`, so every
/// command built from tokens encodes to text that decodes back to it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Token(String);

impl Token {
    pub fn new(text: impl Into<String>) -> Result<Self, ParseError> {
        let text = text.into();
        if text.is_empty() || text.contains(SEPARATORS) {
            return Err(ParseError::InvalidToken(text));
        }
        Ok(Self(text))
    }

    #[must_use]
    pub fn unknown_card() -> Self {
        Self(UNKNOWN_CARD.to_string())
    }

    #[must_use]
    pub fn unknown_build_location() -> Self {
        Self(UNKNOWN_BUILD_LOCATION.to_string())
    }

    #[must_use]
    pub fn unknown_sale_location() -> Self {
        Self(UNKNOWN_SALE_LOCATION.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Token {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Token {
    type Error = ParseError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::new(text)
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The verb of a command, as written in command text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ActionKind {
    Build,
    Network,
    Develop,
    Sell,
    Loan,
    Scout,
    Pass,
}

/// Tile placed or sold at a location, paid for from `resources`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub tile: TileId,
    pub location: Token,
    pub resources: ResourceList,
}

/// One link between two locations.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkArg {
    pub from: Token,
    pub to: Token,
    pub resources: ResourceList,
}

/// One tile removed from the player board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DevelopArg {
    pub tile: TileId,
    pub resources: ResourceList,
}

/// Action kind plus its argument groups.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MainAction {
    Build(SmallVec<[Placement; 1]>),
    Network(SmallVec<[LinkArg; 2]>),
    Develop(SmallVec<[DevelopArg; 2]>),
    Sell(SmallVec<[Placement; 1]>),
    Loan,
    /// Cards discarded to scout.
    Scout(SmallVec<[Token; 2]>),
    Pass,
}

impl MainAction {
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            MainAction::Build(_) => ActionKind::Build,
            MainAction::Network(_) => ActionKind::Network,
            MainAction::Develop(_) => ActionKind::Develop,
            MainAction::Sell(_) => ActionKind::Sell,
            MainAction::Loan => ActionKind::Loan,
            MainAction::Scout(_) => ActionKind::Scout,
            MainAction::Pass => ActionKind::Pass,
        }
    }

    /// Number of argument groups.
    #[must_use]
    pub fn argument_count(&self) -> usize {
        match self {
            MainAction::Build(args) | MainAction::Sell(args) => args.len(),
            MainAction::Network(args) => args.len(),
            MainAction::Develop(args) => args.len(),
            MainAction::Scout(cards) => cards.len(),
            MainAction::Loan | MainAction::Pass => 0,
        }
    }

    /// Single-placement build.
    #[must_use]
    pub fn build(tile: TileId, location: Token, resources: impl IntoIterator<Item = Resource>) -> Self {
        MainAction::Build(smallvec::smallvec![Placement {
            tile,
            location,
            resources: resources.into_iter().collect(),
        }])
    }

    /// Single-placement sale.
    #[must_use]
    pub fn sell(tile: TileId, location: Token, resources: impl IntoIterator<Item = Resource>) -> Self {
        MainAction::Sell(smallvec::smallvec![Placement {
            tile,
            location,
            resources: resources.into_iter().collect(),
        }])
    }
}

/// A fully decoded command.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command {
    /// Card-play counter of the state this command is played from.
    pub card_play: u32,
    pub player: PlayerId,
    /// Card token discarded for the action.
    pub card: Token,
    pub action: MainAction,
}

impl Command {
    #[must_use]
    pub fn new(card_play: u32, player: PlayerId, card: Token, action: MainAction) -> Self {
        Self {
            card_play,
            player,
            card,
            action,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ActionKind {
        self.action.kind()
    }
}

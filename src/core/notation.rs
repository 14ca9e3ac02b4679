//! Command text encoding.
//!
//! ```text
//! <cardPlay>.<playerId>.<action>.<card>:<arg1>;<arg2>;...
//! ```
//!
//! Each argument is `<left><resources>` where the resource suffix is
//! `<r1,r2,...>` or absent when there are none. `left` depends on the kind:
//!
//! | kind            | left            |
//! |-----------------|-----------------|
//! | build, sell     | `tile.location` |
//! | network         | `from.to`       |
//! | develop         | `tile`          |
//! | scout           | `card`          |
//! | loan, pass      | (no arguments)  |
//!
//! Empty argument strings are skipped when decoding, so `0.0.loan.Unknown:`
//! and `0.0.build.Unknown:Coal0.@Unknown0;` both decode. Names are
//! `Token`s and cannot hold a separator, so encoding always produces the
//! canonical form and `decode(encode(cmd)) == cmd` for every command.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use super::action::{ActionKind, Command, DevelopArg, LinkArg, MainAction, Placement, Token};
use super::error::ParseError;
use super::player::PlayerId;
use crate::industry::{Resource, ResourceList, TileId};

fn write_resources(f: &mut fmt::Formatter<'_>, resources: &[Resource]) -> fmt::Result {
    if resources.is_empty() {
        return Ok(());
    }
    f.write_str("<")?;
    for (i, resource) in resources.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{resource}")?;
    }
    f.write_str(">")
}

fn write_separated<T>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    mut write_item: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(";")?;
        }
        write_item(f, item)?;
    }
    Ok(())
}

fn write_placement(f: &mut fmt::Formatter<'_>, placement: &Placement) -> fmt::Result {
    write!(f, "{}.{}", placement.tile, placement.location)?;
    write_resources(f, &placement.resources)
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}:", self.card_play, self.player.0, self.kind(), self.card)?;
        match &self.action {
            MainAction::Build(args) | MainAction::Sell(args) => write_separated(f, args, write_placement),
            MainAction::Network(args) => write_separated(f, args, |f, link| {
                write!(f, "{}.{}", link.from, link.to)?;
                write_resources(f, &link.resources)
            }),
            MainAction::Develop(args) => write_separated(f, args, |f, arg| {
                write!(f, "{}", arg.tile)?;
                write_resources(f, &arg.resources)
            }),
            MainAction::Scout(cards) => write_separated(f, cards, |f, card| f.write_str(card.as_str())),
            MainAction::Loan | MainAction::Pass => Ok(()),
        }
    }
}

/// Parse a non-negative decimal with no sign or leading zeros.
fn parse_number<T: FromStr>(field: &'static str, value: &str) -> Result<T, ParseError> {
    let canonical = !value.is_empty()
        && value.bytes().all(|b| b.is_ascii_digit())
        && (value.len() == 1 || !value.starts_with('0'));
    if !canonical {
        return Err(ParseError::InvalidNumber {
            field,
            value: value.to_string(),
        });
    }
    value.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Split `left<r1,r2>` into `left` and its resources.
fn split_resources(argument: &str) -> Result<(&str, ResourceList), ParseError> {
    let Some(open) = argument.find('<') else {
        if argument.contains('>') {
            return Err(ParseError::MalformedResources(argument.to_string()));
        }
        return Ok((argument, ResourceList::new()));
    };

    let (left, suffix) = argument.split_at(open);
    let inner = suffix
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .filter(|inner| !inner.is_empty() && !inner.contains(['<', '>']))
        .ok_or_else(|| ParseError::MalformedResources(argument.to_string()))?;

    let resources = inner
        .split(',')
        .map(|name| name.parse::<Resource>().map_err(|_| ParseError::UnknownResource(name.to_string())))
        .collect::<Result<ResourceList, _>>()?;
    Ok((left, resources))
}

/// A name inside an argument, reported against the whole argument.
fn argument_token(kind: ActionKind, argument: &str, text: &str) -> Result<Token, ParseError> {
    Token::new(text).map_err(|_| ParseError::MalformedArgument {
        action: kind,
        argument: argument.to_string(),
    })
}

/// Split `a.b` into its two halves.
fn split_pair<'a>(kind: ActionKind, argument: &str, left: &'a str) -> Result<(&'a str, Token), ParseError> {
    let (a, b) = left.split_once('.').ok_or_else(|| ParseError::MalformedArgument {
        action: kind,
        argument: argument.to_string(),
    })?;
    Ok((a, argument_token(kind, argument, b)?))
}

fn parse_placement(kind: ActionKind, argument: &str) -> Result<Placement, ParseError> {
    let (left, resources) = split_resources(argument)?;
    let (tile, location) = split_pair(kind, argument, left)?;
    if tile.is_empty() {
        return Err(ParseError::MalformedArgument {
            action: kind,
            argument: argument.to_string(),
        });
    }
    Ok(Placement {
        tile: tile.parse::<TileId>()?,
        location,
        resources,
    })
}

fn parse_link(argument: &str) -> Result<LinkArg, ParseError> {
    let (left, resources) = split_resources(argument)?;
    let (from, to) = split_pair(ActionKind::Network, argument, left)?;
    let from = argument_token(ActionKind::Network, argument, from)?;
    Ok(LinkArg { from, to, resources })
}

fn parse_develop(argument: &str) -> Result<DevelopArg, ParseError> {
    let (left, resources) = split_resources(argument)?;
    Ok(DevelopArg {
        tile: left.parse::<TileId>()?,
        resources,
    })
}

fn parse_scout_card(argument: &str) -> Result<Token, ParseError> {
    argument_token(ActionKind::Scout, argument, argument)
}

fn collect<T, A: smallvec::Array<Item = T>>(
    arguments: &[&str],
    parse: impl Fn(&str) -> Result<T, ParseError>,
) -> Result<SmallVec<A>, ParseError> {
    arguments.iter().map(|&argument| parse(argument)).collect()
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut halves = s.split(':');
        let (Some(header), Some(body), None) = (halves.next(), halves.next(), halves.next()) else {
            return Err(ParseError::MissingSeparator(s.to_string()));
        };

        let fields: Vec<&str> = header.split('.').collect();
        let [card_play, player, kind, card] = fields.as_slice() else {
            return Err(ParseError::MalformedHeader(header.to_string()));
        };

        let card_play = parse_number::<u32>("card play", card_play)?;
        let player = PlayerId::new(parse_number::<u8>("player id", player)?);
        let kind = kind
            .parse::<ActionKind>()
            .map_err(|_| ParseError::UnknownAction(kind.to_string()))?;
        let card = Token::new(*card).map_err(|_| ParseError::MalformedHeader(header.to_string()))?;

        let arguments: Vec<&str> = body.split(';').filter(|arg| !arg.is_empty()).collect();

        let action = match kind {
            ActionKind::Build => MainAction::Build(collect(&arguments, |a| parse_placement(kind, a))?),
            ActionKind::Sell => MainAction::Sell(collect(&arguments, |a| parse_placement(kind, a))?),
            ActionKind::Network => MainAction::Network(collect(&arguments, parse_link)?),
            ActionKind::Develop => MainAction::Develop(collect(&arguments, parse_develop)?),
            ActionKind::Scout => MainAction::Scout(collect(&arguments, parse_scout_card)?),
            ActionKind::Loan | ActionKind::Pass => {
                if let Some(argument) = arguments.first() {
                    return Err(ParseError::UnexpectedArgument {
                        action: kind,
                        argument: argument.to_string(),
                    });
                }
                if kind == ActionKind::Loan {
                    MainAction::Loan
                } else {
                    MainAction::Pass
                }
            }
        };

        Ok(Command {
            card_play,
            player,
            card,
            action,
        })
    }
}

//! Tile definitions - static industry data.
//!
//! `TileDefinition` holds the immutable properties of one industry tile:
//! what it costs, what it produces, and what it scores when it flips.
//! Runtime state of a built tile lives separately in `PlayedIndustry`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum::{Display, EnumIter, EnumString};

use crate::core::error::ParseError;

/// A raw resource moved by the ledger.
///
/// Coal and iron can be bought from a market; beer only comes off the board.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum Resource {
    Coal,
    Iron,
    Beer,
}

impl Resource {
    /// The industry family whose tiles supply this resource.
    #[must_use]
    pub const fn source_family(self) -> IndustryFamily {
        match self {
            Resource::Coal => IndustryFamily::Coal,
            Resource::Iron => IndustryFamily::Iron,
            Resource::Beer => IndustryFamily::Beer,
        }
    }
}

/// Ordered resource list as written in a command or a cost.
pub type ResourceList = SmallVec<[Resource; 4]>;

/// An industry family: an ordered stack of tiles a player builds through.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum IndustryFamily {
    Crate,
    Shed,
    Pottery,
    Beer,
    Iron,
    Coal,
}

impl IndustryFamily {
    /// Number of families.
    pub const COUNT: usize = 6;

    /// All families in build-option order.
    pub const ALL: [IndustryFamily; Self::COUNT] = [
        IndustryFamily::Crate,
        IndustryFamily::Shed,
        IndustryFamily::Pottery,
        IndustryFamily::Beer,
        IndustryFamily::Iron,
        IndustryFamily::Coal,
    ];

    /// Dense index for per-family tables.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            IndustryFamily::Crate => 0,
            IndustryFamily::Shed => 1,
            IndustryFamily::Pottery => 2,
            IndustryFamily::Beer => 3,
            IndustryFamily::Iron => 4,
            IndustryFamily::Coal => 5,
        }
    }

    /// The resource this family's output is sold into a market as, if any.
    #[must_use]
    pub const fn market_resource(self) -> Option<Resource> {
        match self {
            IndustryFamily::Coal => Some(Resource::Coal),
            IndustryFamily::Iron => Some(Resource::Iron),
            _ => None,
        }
    }
}

/// Producer of raw resources vs. manufactured goods that are sold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum IndustryKind {
    Primary,
    Manufactured,
}

impl IndustryKind {
    /// Anything not labelled "Manufactured" is a primary producer.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label.trim() == "Manufactured" {
            IndustryKind::Manufactured
        } else {
            IndustryKind::Primary
        }
    }
}

/// Game phase.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Era {
    #[default]
    Canal,
    Rail,
}

/// Era a tile may be built in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EraRestriction {
    #[default]
    None,
    CanalOnly,
    RailOnly,
}

impl EraRestriction {
    /// Whether a tile with this restriction may be built in `era`.
    #[must_use]
    pub const fn permits(self, era: Era) -> bool {
        match self {
            EraRestriction::None => true,
            EraRestriction::CanalOnly => matches!(era, Era::Canal),
            EraRestriction::RailOnly => matches!(era, Era::Rail),
        }
    }
}

/// Identity of a tile: family plus position in the family's stack.
///
/// Written as the family name followed by the sequence, e.g. `Coal0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId {
    pub family: IndustryFamily,
    pub sequence: u8,
}

impl TileId {
    #[must_use]
    pub const fn new(family: IndustryFamily, sequence: u8) -> Self {
        Self { family, sequence }
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.family, self.sequence)
    }
}

impl FromStr for TileId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| ParseError::InvalidTile(s.to_string()))?;
        let (name, digits) = s.split_at(split);
        let family = name
            .parse::<IndustryFamily>()
            .map_err(|_| ParseError::InvalidTile(s.to_string()))?;
        // Reject signs and leading zeros so the text round-trips.
        if !digits.bytes().all(|b| b.is_ascii_digit()) || (digits.len() > 1 && digits.starts_with('0')) {
            return Err(ParseError::InvalidTile(s.to_string()));
        }
        let sequence = digits
            .parse::<u8>()
            .map_err(|_| ParseError::InvalidTile(s.to_string()))?;
        Ok(Self { family, sequence })
    }
}

/// Static tile definition.
///
/// ## Example
///
/// ```
/// use brass_sim::industry::{Era, IndustryFamily, Resource, TileDefinition, TileId};
///
/// let mine = TileDefinition::new(TileId::new(IndustryFamily::Coal, 3))
///     .with_money_cost(8)
///     .with_resource_cost(0, 1)
///     .with_production(4, 0, 0, 0);
///
/// assert_eq!(mine.cost_list().as_slice(), &[Resource::Iron]);
/// assert_eq!(mine.production(Era::Canal), 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDefinition {
    pub id: TileId,
    pub kind: IndustryKind,
    pub level: u8,
    /// Copies of this level in the family.
    pub count: u8,
    /// Tiles in the whole family.
    pub type_total: u8,
    pub money_cost: i32,
    pub coal_cost: u8,
    pub iron_cost: u8,
    pub era_restriction: EraRestriction,
    /// Beer consumed when this tile is sold.
    pub beer_cost: u8,
    pub development_restricted: bool,
    pub coal_production: u8,
    pub iron_production: u8,
    pub beer_production_canal: u8,
    pub beer_production_rail: u8,
    pub points: i32,
    pub income_levels: i32,
    pub links: u8,
}

impl TileDefinition {
    /// A free, non-producing primary tile. Fill in with the `with_*` builders.
    #[must_use]
    pub fn new(id: TileId) -> Self {
        Self {
            id,
            kind: IndustryKind::Primary,
            level: 1,
            count: 1,
            type_total: 1,
            money_cost: 0,
            coal_cost: 0,
            iron_cost: 0,
            era_restriction: EraRestriction::None,
            beer_cost: 0,
            development_restricted: false,
            coal_production: 0,
            iron_production: 0,
            beer_production_canal: 0,
            beer_production_rail: 0,
            points: 0,
            income_levels: 0,
            links: 0,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: IndustryKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_money_cost(mut self, cost: i32) -> Self {
        self.money_cost = cost;
        self
    }

    #[must_use]
    pub fn with_resource_cost(mut self, coal: u8, iron: u8) -> Self {
        self.coal_cost = coal;
        self.iron_cost = iron;
        self
    }

    #[must_use]
    pub fn with_beer_cost(mut self, beer: u8) -> Self {
        self.beer_cost = beer;
        self
    }

    #[must_use]
    pub fn with_production(mut self, coal: u8, iron: u8, beer_canal: u8, beer_rail: u8) -> Self {
        self.coal_production = coal;
        self.iron_production = iron;
        self.beer_production_canal = beer_canal;
        self.beer_production_rail = beer_rail;
        self
    }

    #[must_use]
    pub fn with_scoring(mut self, points: i32, income_levels: i32) -> Self {
        self.points = points;
        self.income_levels = income_levels;
        self
    }

    #[must_use]
    pub fn with_era_restriction(mut self, restriction: EraRestriction) -> Self {
        self.era_restriction = restriction;
        self
    }

    #[must_use]
    pub fn with_development_restriction(mut self, restricted: bool) -> Self {
        self.development_restricted = restricted;
        self
    }

    #[must_use]
    pub fn family(&self) -> IndustryFamily {
        self.id.family
    }

    #[must_use]
    pub fn is_manufactured(&self) -> bool {
        self.kind == IndustryKind::Manufactured
    }

    /// Resources needed to build, sorted (coal units then iron units).
    #[must_use]
    pub fn cost_list(&self) -> ResourceList {
        let mut cost = ResourceList::new();
        cost.extend(std::iter::repeat(Resource::Coal).take(self.coal_cost as usize));
        cost.extend(std::iter::repeat(Resource::Iron).take(self.iron_cost as usize));
        cost
    }

    /// Beer needed to sell this tile.
    #[must_use]
    pub fn beer_list(&self) -> ResourceList {
        std::iter::repeat(Resource::Beer)
            .take(self.beer_cost as usize)
            .collect()
    }

    /// Units placed on the tile when it is built in `era`.
    #[must_use]
    pub fn production(&self, era: Era) -> u8 {
        let beer = match era {
            Era::Canal => self.beer_production_canal,
            Era::Rail => self.beer_production_rail,
        };
        self.coal_production + self.iron_production + beer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_id_display_and_parse() {
        let id = TileId::new(IndustryFamily::Pottery, 2);
        assert_eq!(id.to_string(), "Pottery2");
        assert_eq!("Pottery2".parse::<TileId>().unwrap(), id);
        assert_eq!("Crate10".parse::<TileId>().unwrap(), TileId::new(IndustryFamily::Crate, 10));
    }

    #[test]
    fn test_tile_id_rejects_garbage() {
        for bad in ["Coal", "Wood0", "0", "Coal01", "Coal-1", "", "Coal0x"] {
            assert!(bad.parse::<TileId>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_cost_list_is_sorted() {
        let tile = TileDefinition::new(TileId::new(IndustryFamily::Shed, 5)).with_resource_cost(1, 1);
        assert_eq!(tile.cost_list().as_slice(), &[Resource::Coal, Resource::Iron]);
    }

    #[test]
    fn test_beer_production_depends_on_era() {
        let brewery = TileDefinition::new(TileId::new(IndustryFamily::Beer, 0)).with_production(0, 0, 1, 2);
        assert_eq!(brewery.production(Era::Canal), 1);
        assert_eq!(brewery.production(Era::Rail), 2);
    }

    #[test]
    fn test_era_restriction() {
        assert!(EraRestriction::None.permits(Era::Rail));
        assert!(EraRestriction::CanalOnly.permits(Era::Canal));
        assert!(!EraRestriction::CanalOnly.permits(Era::Rail));
        assert!(!EraRestriction::RailOnly.permits(Era::Canal));
    }

    #[test]
    fn test_resource_names() {
        assert_eq!("Beer".parse::<Resource>().unwrap(), Resource::Beer);
        assert_eq!(Resource::Iron.to_string(), "Iron");
        assert!("beer".parse::<Resource>().is_err());
        assert_eq!(Resource::Coal.source_family(), IndustryFamily::Coal);
    }

    #[test]
    fn test_family_indices_are_dense() {
        for (i, family) in IndustryFamily::ALL.iter().enumerate() {
            assert_eq!(family.index(), i);
        }
    }
}

//! Industry catalog for tile definition lookup.
//!
//! The `IndustryCatalog` stores every tile definition of a game, keyed by
//! `TileId`, plus each family's tiles in build order. It is built once at
//! startup and shared read-only (behind an `Arc`) by every game state.
//!
//! ## Input format
//!
//! A headered CSV, one row per tile. Blank numeric cells read as 0, a blank
//! age restriction means "none", and any non-blank development restriction
//! cell marks the tile as restricted.

use std::io;
use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::definition::{EraRestriction, IndustryFamily, IndustryKind, TileDefinition, TileId};
use crate::core::error::CatalogError;

/// The Birmingham tile table shipped with the crate.
const STANDARD_CATALOG: &str = include_str!("../../data/industry_data.csv");

/// One catalog row as it appears in the CSV.
#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Industry")]
    industry: String,
    #[serde(rename = "Industry Type")]
    industry_type: String,
    #[serde(rename = "Level")]
    level: u8,
    #[serde(rename = "Count")]
    count: u8,
    #[serde(rename = "Sequence")]
    sequence: u8,
    #[serde(rename = "Type Total")]
    type_total: u8,
    #[serde(rename = "Money Cost")]
    money_cost: i32,
    #[serde(rename = "Coal Cost", default)]
    coal_cost: Option<u8>,
    #[serde(rename = "Iron Cost", default)]
    iron_cost: Option<u8>,
    #[serde(rename = "Age Restriction", alias = "Age Resttriction", default)]
    age_restriction: Option<String>,
    #[serde(rename = "Beer Cost", default)]
    beer_cost: Option<u8>,
    #[serde(rename = "Development Restriction", default)]
    development_restriction: Option<String>,
    #[serde(rename = "Coal Production", default)]
    coal_production: Option<u8>,
    #[serde(rename = "Iron Production", default)]
    iron_production: Option<u8>,
    #[serde(rename = "Beer Production Canal", default)]
    beer_production_canal: Option<u8>,
    #[serde(rename = "Beer Production Rail", default)]
    beer_production_rail: Option<u8>,
    #[serde(rename = "Points", default)]
    points: Option<i32>,
    #[serde(rename = "Income Levels", default)]
    income_levels: Option<i32>,
    #[serde(rename = "Links", default)]
    links: Option<u8>,
}

impl CatalogRow {
    fn into_definition(self) -> Result<TileDefinition, CatalogError> {
        let family = self
            .industry
            .trim()
            .parse::<IndustryFamily>()
            .map_err(|_| CatalogError::UnknownFamily(self.industry.clone()))?;

        let era_restriction = match self.age_restriction.as_deref().map(str::trim) {
            None | Some("") => EraRestriction::None,
            Some(label) if label.eq_ignore_ascii_case("canal") => EraRestriction::CanalOnly,
            Some(label) if label.eq_ignore_ascii_case("rail") => EraRestriction::RailOnly,
            Some(other) => return Err(CatalogError::UnknownRestriction(other.to_string())),
        };

        let development_restricted = self
            .development_restriction
            .as_deref()
            .is_some_and(|cell| !cell.trim().is_empty());

        Ok(TileDefinition {
            id: TileId::new(family, self.sequence),
            kind: IndustryKind::from_label(&self.industry_type),
            level: self.level,
            count: self.count,
            type_total: self.type_total,
            money_cost: self.money_cost,
            coal_cost: self.coal_cost.unwrap_or(0),
            iron_cost: self.iron_cost.unwrap_or(0),
            era_restriction,
            beer_cost: self.beer_cost.unwrap_or(0),
            development_restricted,
            coal_production: self.coal_production.unwrap_or(0),
            iron_production: self.iron_production.unwrap_or(0),
            beer_production_canal: self.beer_production_canal.unwrap_or(0),
            beer_production_rail: self.beer_production_rail.unwrap_or(0),
            points: self.points.unwrap_or(0),
            income_levels: self.income_levels.unwrap_or(0),
            links: self.links.unwrap_or(0),
        })
    }
}

/// Catalog of tile definitions.
///
/// ## Example
///
/// ```
/// use brass_sim::industry::{IndustryCatalog, IndustryFamily, TileId};
///
/// let catalog = IndustryCatalog::standard().unwrap();
///
/// let mine = catalog.get(TileId::new(IndustryFamily::Coal, 0)).unwrap();
/// assert_eq!(mine.coal_production, 2);
/// assert_eq!(catalog.family_len(IndustryFamily::Crate), 11);
/// ```
#[derive(Clone, Debug, Default)]
pub struct IndustryCatalog {
    tiles: FxHashMap<TileId, Arc<TileDefinition>>,
    layout: [Vec<Arc<TileDefinition>>; IndustryFamily::COUNT],
}

impl IndustryCatalog {
    /// Build a catalog from definitions, checking that every family's
    /// sequences are unique and contiguous from 0.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = TileDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for definition in definitions {
            let id = definition.id;
            if catalog.tiles.contains_key(&id) {
                return Err(CatalogError::DuplicateTile(id));
            }
            let definition = Arc::new(definition);
            catalog.layout[id.family.index()].push(Arc::clone(&definition));
            catalog.tiles.insert(id, definition);
        }

        for (family, tiles) in IndustryFamily::ALL.iter().zip(catalog.layout.iter_mut()) {
            tiles.sort_by_key(|tile| tile.id.sequence);
            for (expected, tile) in tiles.iter().enumerate() {
                if tile.id.sequence as usize != expected {
                    return Err(CatalogError::NonContiguous {
                        family: *family,
                        expected: expected as u8,
                        found: tile.id.sequence,
                    });
                }
            }
        }

        Ok(catalog)
    }

    /// Parse a headered CSV table.
    pub fn from_csv_reader<R: io::Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut definitions = Vec::new();
        for row in csv.deserialize::<CatalogRow>() {
            definitions.push(row?.into_definition()?);
        }

        let catalog = Self::from_definitions(definitions)?;
        tracing::debug!(tiles = catalog.len(), "loaded industry catalog");
        Ok(catalog)
    }

    /// Load a CSV table from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(io::BufReader::new(file))
    }

    /// The bundled Birmingham table.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::from_csv_reader(STANDARD_CATALOG.as_bytes())
    }

    /// Get a tile definition.
    #[must_use]
    pub fn get(&self, id: TileId) -> Option<&Arc<TileDefinition>> {
        self.tiles.get(&id)
    }

    /// Get the tile at `sequence` in `family`.
    #[must_use]
    pub fn tile(&self, family: IndustryFamily, sequence: u8) -> Option<&Arc<TileDefinition>> {
        self.layout[family.index()].get(sequence as usize)
    }

    /// A family's tiles in build order.
    #[must_use]
    pub fn family(&self, family: IndustryFamily) -> &[Arc<TileDefinition>] {
        &self.layout[family.index()]
    }

    /// Number of tiles in a family.
    #[must_use]
    pub fn family_len(&self, family: IndustryFamily) -> usize {
        self.layout[family.index()].len()
    }

    /// Total number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Iterate over all tiles, family by family in build order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TileDefinition>> {
        self.layout.iter().flatten()
    }
}

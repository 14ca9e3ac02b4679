//! Industry system: tile definitions, the catalog, and played tiles.
//!
//! ## Key Types
//!
//! - `TileId`: Family plus sequence, written `Coal0`, `Pottery2`
//! - `TileDefinition`: Static tile data (costs, production, scoring)
//! - `IndustryCatalog`: Definition lookup, loaded once and shared by `Arc`
//! - `PlayedIndustry`: A built tile and its production countdown
//! - `Market`: Coal and iron price tables with a fill level

pub mod catalog;
pub mod definition;
pub mod market;
pub mod played;

pub use catalog::IndustryCatalog;
pub use definition::{
    Era, EraRestriction, IndustryFamily, IndustryKind, Resource, ResourceList, TileDefinition, TileId,
};
pub use market::Market;
pub use played::{Award, PlayedIndustry};

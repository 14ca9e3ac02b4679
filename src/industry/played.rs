//! Played industries - runtime tile state.
//!
//! A `PlayedIndustry` is a tile on the board. It starts active with the
//! production units its definition grants for the era it was built in, and
//! flips exactly once: either its last unit is consumed, or (manufactured
//! tiles only) it is sold. The flip yields the tile's `Award`, which the
//! caller applies to the owner.

use std::fmt;
use std::sync::Arc;

use super::definition::{Era, Resource, TileDefinition, TileId};
use crate::core::error::ActionError;
use crate::core::player::PlayerId;

/// Score and income granted when a tile flips.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Award {
    pub points: i32,
    pub income_levels: i32,
}

/// A tile built on the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayedIndustry {
    /// Player who built the tile and receives its award.
    pub owner: PlayerId,
    definition: Arc<TileDefinition>,
    /// Era the tile was built in.
    pub era_built: Era,
    remaining: u8,
    flipped: bool,
}

impl PlayedIndustry {
    #[must_use]
    pub fn new(owner: PlayerId, definition: Arc<TileDefinition>, era: Era) -> Self {
        let remaining = definition.production(era);
        Self {
            owner,
            definition,
            era_built: era,
            remaining,
            flipped: false,
        }
    }

    #[must_use]
    pub fn tile(&self) -> TileId {
        self.definition.id
    }

    #[must_use]
    pub fn definition(&self) -> &TileDefinition {
        &self.definition
    }

    /// Production units left on the tile.
    #[must_use]
    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Whether this tile can hand out a unit of `resource` right now.
    #[must_use]
    pub fn supplies(&self, resource: Resource) -> bool {
        self.definition.family() == resource.source_family() && self.remaining > 0
    }

    /// Consume one unit. Returns the award if this emptied the tile.
    pub fn spend_resource(&mut self) -> Result<Option<Award>, ActionError> {
        if self.flipped || self.remaining == 0 {
            return Err(ActionError::TileExhausted { tile: self.tile() });
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            return Ok(Some(self.flip()));
        }
        Ok(None)
    }

    /// Sell a manufactured tile, flipping it.
    pub fn sell(&mut self) -> Result<Award, ActionError> {
        if !self.definition.is_manufactured() {
            return Err(ActionError::NotSellable { tile: self.tile() });
        }
        if self.flipped {
            return Err(ActionError::TileExhausted { tile: self.tile() });
        }
        Ok(self.flip())
    }

    fn flip(&mut self) -> Award {
        self.flipped = true;
        self.remaining = 0;
        Award {
            points: self.definition.points,
            income_levels: self.definition.income_levels,
        }
    }
}

impl fmt::Display for PlayedIndustry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.flipped {
            write!(f, "{}-P{}-F", self.tile(), self.owner.0)
        } else {
            write!(f, "{}-P{}-U{}", self.tile(), self.owner.0, self.remaining)
        }
    }
}

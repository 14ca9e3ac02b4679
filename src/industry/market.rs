//! Coal and iron markets.
//!
//! A market is a price table plus a fill level indexing into it. Buying
//! pays the price at the current level and pushes the level one step toward
//! the expensive end; selling pays the price at the current level and then
//! pulls it one step back.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::definition::Resource;

/// Coal price by fill level.
pub const COAL_PRICES: [i32; 15] = [1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8];

/// Iron price by fill level.
pub const IRON_PRICES: [i32; 11] = [1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6];

/// A resource market.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    resource: Resource,
    level: usize,
}

impl Market {
    /// Market for `resource`, or `None` if nobody trades it.
    /// The level is clamped to the table.
    #[must_use]
    pub fn new(resource: Resource, level: usize) -> Option<Self> {
        let prices = Self::table(resource)?;
        Some(Self {
            resource,
            level: level.min(prices.len() - 1),
        })
    }

    #[must_use]
    pub fn coal(level: usize) -> Self {
        Self {
            resource: Resource::Coal,
            level: level.min(COAL_PRICES.len() - 1),
        }
    }

    #[must_use]
    pub fn iron(level: usize) -> Self {
        Self {
            resource: Resource::Iron,
            level: level.min(IRON_PRICES.len() - 1),
        }
    }

    fn table(resource: Resource) -> Option<&'static [i32]> {
        match resource {
            Resource::Coal => Some(&COAL_PRICES),
            Resource::Iron => Some(&IRON_PRICES),
            Resource::Beer => None,
        }
    }

    #[must_use]
    pub fn resource(&self) -> Resource {
        self.resource
    }

    #[must_use]
    pub fn prices(&self) -> &'static [i32] {
        // Beer markets cannot be constructed.
        Self::table(self.resource).unwrap_or(&IRON_PRICES)
    }

    /// Current fill level.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Price of the next unit bought.
    #[must_use]
    pub fn price(&self) -> i32 {
        self.prices()[self.level]
    }

    /// Whether the market can still take a unit.
    #[must_use]
    pub fn accepts_sale(&self) -> bool {
        self.level > 0
    }

    /// Buy one unit, returning its price.
    pub fn buy(&mut self) -> i32 {
        let price = self.price();
        self.level = (self.level + 1).min(self.prices().len() - 1);
        price
    }

    /// Sell one unit at the current price, or `None` when the market is
    /// already at level 0.
    pub fn sell(&mut self) -> Option<i32> {
        if !self.accepts_sale() {
            return None;
        }
        let price = self.price();
        self.level -= 1;
        Some(price)
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} market level {} (£{})", self.resource, self.level, self.price())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buy_walks_up_and_clamps() {
        let mut market = Market::iron(9);
        assert_eq!(market.buy(), 5);
        assert_eq!(market.level(), 10);
        assert_eq!(market.buy(), 6);
        assert_eq!(market.level(), 10);
        assert_eq!(market.buy(), 6);
    }

    #[test]
    fn test_sell_pays_level_before_step() {
        let mut market = Market::coal(3);
        assert_eq!(market.sell(), Some(2));
        assert_eq!(market.level(), 2);
        assert_eq!(market.sell(), Some(2));
        assert_eq!(market.sell(), Some(1));
        assert_eq!(market.level(), 0);
        assert_eq!(market.sell(), None);
        assert_eq!(market.level(), 0);
    }

    #[test]
    fn test_no_beer_market() {
        assert!(Market::new(Resource::Beer, 0).is_none());
        assert_eq!(Market::new(Resource::Coal, 99).unwrap().level(), 14);
    }
}

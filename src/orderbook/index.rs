//! Active price levels for one side of the book.
//!
//! Levels are kept in a `BTreeMap`, which provides:
//!
//! - O(log n) insertion, deletion, and lookup by price
//! - O(log n) access to the best price (via `first_key_value` / `last_key_value`)
//! - Ordered iteration, so priority order never needs a re-sort
//!
//! The side's total volume is kept alongside the map and bounded by
//! `Decimal::MAX`: an insert that would exceed it is rejected up front.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::Error;
use crate::types::{OrderId, Price, Quantity, Side};
use crate::Result;

use super::level::PriceLevel;
use super::order::{Order, OrderRef};
use super::trade::{total_filled, Match};

/// Price levels of one side, best price first.
///
/// Asks are best at the lowest price, bids at the highest. A price is present
/// iff at least one order rests there.
#[derive(Debug, Clone)]
pub struct PriceLevelIndex {
    side: Side,
    levels: BTreeMap<Price, PriceLevel>,
    /// Sum of every level's volume
    volume: Quantity,
}

impl PriceLevelIndex {
    /// Create an empty index for `side`
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            volume: Quantity::ZERO,
        }
    }

    /// Side this index holds
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Best active price
    #[must_use]
    pub fn best_price(&self) -> Option<Price> {
        self.best().map(PriceLevel::price)
    }

    /// Level at the best price
    #[must_use]
    pub fn best(&self) -> Option<&PriceLevel> {
        match self.side {
            Side::Bid => self.levels.last_key_value().map(|(_, l)| l),
            Side::Ask => self.levels.first_key_value().map(|(_, l)| l),
        }
    }

    /// Level at an exact price
    #[must_use]
    pub fn get(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    /// Levels in priority order, best first
    pub fn iter(&self) -> Box<dyn Iterator<Item = &PriceLevel> + '_> {
        match self.side {
            Side::Bid => Box::new(self.levels.values().rev()),
            Side::Ask => Box::new(self.levels.values()),
        }
    }

    /// Number of active levels
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Check if no level is active
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Sum of the volume of every active level
    #[must_use]
    pub const fn total_volume(&self) -> Quantity {
        self.volume
    }

    /// Check that `size` more can rest on this side
    ///
    /// # Errors
    ///
    /// Returns [`Error::VolumeOverflow`] if the side total would exceed the
    /// largest representable quantity.
    pub fn check_capacity(&self, size: Quantity) -> Result<Quantity> {
        self.volume
            .checked_add(size)
            .ok_or(Error::VolumeOverflow { side: self.side })
    }

    /// Check if a level at `price` on this side can trade with an opposite
    /// order limited at `limit`
    #[must_use]
    pub fn is_marketable(&self, price: Price, limit: Price) -> bool {
        match self.side {
            Side::Ask => price <= limit,
            Side::Bid => price >= limit,
        }
    }

    /// Rest an order at `price`, creating the level on first use.
    ///
    /// Level volumes never exceed the side total, so once the total fits
    /// every level does too.
    pub(crate) fn insert(&mut self, price: Price, order: Order) -> Result<OrderRef> {
        let volume = self.check_capacity(order.remaining_size())?;
        let side = self.side;
        let order_ref = self
            .levels
            .entry(price)
            .or_insert_with(|| {
                debug!(side = %side, price = %price, "opened price level");
                PriceLevel::new(side, price)
            })
            .add_order(order);
        self.volume = volume;
        Ok(order_ref)
    }

    /// Withdraw a resting order, closing its level if it empties
    pub(crate) fn remove_order(&mut self, price: Price, id: OrderId) -> Option<Order> {
        let order = self.levels.get_mut(&price)?.remove_order(id)?;
        self.volume -= order.remaining_size();
        self.remove_if_empty(price);
        Some(order)
    }

    /// Fill `aggressor` against the level at `price`, closing it if drained
    ///
    /// # Errors
    ///
    /// [`Error::UnknownPriceLevel`] if no level is active at `price`, or the
    /// level's own rejection of the aggressor.
    pub(crate) fn fill(&mut self, price: Price, aggressor: &mut Order) -> Result<Vec<Match>> {
        let side = self.side;
        let matches = self
            .levels
            .get_mut(&price)
            .ok_or(Error::UnknownPriceLevel { side, price })?
            .fill(aggressor)?;
        self.volume -= total_filled(&matches);
        self.remove_if_empty(price);
        Ok(matches)
    }

    /// Drop the level at `price` if it has no resting orders
    fn remove_if_empty(&mut self, price: Price) -> bool {
        if self.levels.get(&price).is_some_and(PriceLevel::is_empty) {
            self.levels.remove(&price);
            debug!(side = %self.side, price = %price, "closed price level");
            true
        } else {
            false
        }
    }
}

//! A single price level and the fill algorithm.
//!
//! Resting orders are kept in a `VecDeque` ordered by arrival sequence
//! (oldest first). The aggregate volume is maintained incrementally on every
//! add, remove and fill, never recomputed by scanning.

use std::collections::VecDeque;

use tracing::debug;

use crate::error::Error;
use crate::types::{OrderId, Price, Quantity, Side};
use crate::Result;

use super::order::{Order, OrderRef};
use super::trade::Match;

/// All resting orders at one exact price on one side.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    side: Side,
    price: Price,
    orders: VecDeque<Order>,
    volume: Quantity,
}

impl PriceLevel {
    /// Create an empty level
    #[must_use]
    pub fn new(side: Side, price: Price) -> Self {
        Self {
            side,
            price,
            orders: VecDeque::new(),
            volume: Quantity::ZERO,
        }
    }

    /// Side the level belongs to
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Price of the level
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// Sum of the remaining size of every resting order
    #[must_use]
    pub const fn volume(&self) -> Quantity {
        self.volume
    }

    /// Number of resting orders
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check if no order rests here
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Resting orders in time priority
    pub fn orders(&self) -> impl Iterator<Item = &Order> + '_ {
        self.orders.iter()
    }

    /// Oldest resting order
    #[must_use]
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Look up a resting order by id
    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id() == id)
    }

    /// Rest an order at this level.
    ///
    /// The order is placed after every order with an equal or lower arrival
    /// sequence, which is a plain append for orders stamped by one book.
    pub(crate) fn add_order(&mut self, mut order: Order) -> OrderRef {
        debug_assert_eq!(order.side(), self.side);
        debug_assert!(!order.is_filled());

        order.set_level(self.price);
        self.volume += order.remaining_size();

        let id = order.id();
        let pos = self
            .orders
            .partition_point(|o| o.sequence() <= order.sequence());
        self.orders.insert(pos, order);

        OrderRef {
            id,
            side: self.side,
            price: self.price,
        }
    }

    /// Withdraw an order, keeping the others in time priority
    pub(crate) fn remove_order(&mut self, id: OrderId) -> Option<Order> {
        let pos = self.orders.iter().position(|o| o.id() == id)?;
        let mut order = self.orders.remove(pos)?;
        self.volume -= order.remaining_size();
        order.clear_level();
        Some(order)
    }

    /// Consume resting orders oldest-first until the aggressor is filled or
    /// the level is exhausted.
    ///
    /// Every match is priced at this level's price. Filled resting orders are
    /// removed after the pass.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrder`] if the aggressor is already filled or
    /// sits on the same side as this level. Nothing is mutated in that case.
    pub(crate) fn fill(&mut self, aggressor: &mut Order) -> Result<Vec<Match>> {
        if aggressor.is_filled() {
            return Err(Error::invalid_order(format!(
                "order {} is already filled",
                aggressor.id()
            )));
        }
        if aggressor.side() == self.side {
            return Err(Error::invalid_order(format!(
                "{} order {} cannot fill against a {} level",
                aggressor.side(),
                aggressor.id(),
                self.side
            )));
        }

        let mut matches = Vec::new();
        let mut drained = 0usize;

        for resting in self.orders.iter_mut() {
            let quantity = resting.remaining_size().min(aggressor.remaining_size());

            resting.fill(quantity);
            aggressor.fill(quantity);
            self.volume -= quantity;

            matches.push(Match::between(aggressor, resting, quantity, self.price));

            if resting.is_filled() {
                drained += 1;
            }
            if aggressor.is_filled() {
                break;
            }
        }

        // Deferred removal; retain keeps the survivors in arrival order.
        if drained > 0 {
            self.orders.retain(|o| !o.is_filled());
        }

        debug!(
            side = %self.side,
            price = %self.price,
            fills = matches.len(),
            drained,
            volume = %self.volume,
            "filled against level"
        );

        Ok(matches)
    }
}

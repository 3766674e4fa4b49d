//! Core orderbook data structure and order placement.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::Error;
use crate::types::{Price, Quantity, Side};
use crate::Result;

use super::index::PriceLevelIndex;
use super::level::PriceLevel;
use super::order::{Order, OrderRef};
use super::snapshot::BookSnapshot;
use super::trade::{LimitOrderOutcome, MarketOrderOutcome, Match};

/// Limit order book for a single instrument.
///
/// # Design Decisions
///
/// 1. **Decimal prices and sizes**: exact arithmetic, so a level's volume is
///    always exactly the sum of its orders and `remaining == 0` is reliable.
///
/// 2. **BTreeMap per side**: see [`PriceLevelIndex`]. Best price and priority
///    order come from the map itself, no re-sorting.
///
/// 3. **No order registry**: orders live only inside the levels holding them.
///    Cancellation goes through the caller's [`OrderRef`], which names the
///    side and level price.
///
/// 4. **Validate, then mutate**: every precondition is checked before the
///    first fill, so a rejected call leaves the book untouched. This covers
///    volume capacity too: a side never holds more than `Decimal::MAX`.
///
/// 5. **The book owns identity**: ids and arrival sequences come from one
///    counter, and an order handed to `execute_*` is re-stamped from it.
///
/// # Thread Safety
///
/// This struct is `Send + Sync` but not internally synchronized. For
/// concurrent access, wrap in `parking_lot::RwLock` (see
/// [`Exchange`](crate::exchange::Exchange)) or hand it to a dedicated task
/// (see [`engine`](crate::engine)).
#[derive(Debug, Clone)]
pub struct Orderbook {
    bids: PriceLevelIndex,
    asks: PriceLevelIndex,
    /// Issues both order ids and arrival sequences
    next_sequence: u64,
}

impl Orderbook {
    /// Create a new empty orderbook
    #[must_use]
    pub fn new() -> Self {
        Self {
            bids: PriceLevelIndex::new(Side::Bid),
            asks: PriceLevelIndex::new(Side::Ask),
            next_sequence: 1,
        }
    }

    /// Create an order stamped with the next id and arrival sequence
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrder`] if `size` is not positive.
    pub fn new_order(&mut self, side: Side, size: Quantity) -> Result<Order> {
        validate_size(size)?;
        let sequence = self.next_arrival();
        Ok(Order::new(sequence, sequence, side, size))
    }

    fn next_arrival(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    fn restamp(&mut self, order: &mut Order) {
        let sequence = self.next_arrival();
        order.restamp(sequence, sequence);
    }

    /// Place a market order of `size` on `side`.
    ///
    /// Walks the opposite side best price first until the order is filled.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidOrder`] if `size` is not positive
    /// - [`Error::InsufficientLiquidity`] if the opposite side holds less
    ///   than `size`; the book is left unchanged
    pub fn place_market_order(&mut self, side: Side, size: Quantity) -> Result<MarketOrderOutcome> {
        validate_size(size)?;
        self.check_liquidity(side, size)?;

        let mut order = self.new_order(side, size)?;
        let matches = self.run_market(&mut order)?;
        Ok(MarketOrderOutcome {
            order_id: order.id(),
            matches,
        })
    }

    /// Execute a caller-held order as a market order.
    ///
    /// The order is first given a fresh id and arrival sequence from this
    /// book; its remaining size is consumed in place.
    ///
    /// # Errors
    ///
    /// Same as [`place_market_order`](Self::place_market_order), plus
    /// [`Error::InvalidOrder`] for an order that is filled or resting.
    pub fn execute_market(&mut self, order: &mut Order) -> Result<Vec<Match>> {
        validate_aggressor(order)?;
        self.check_liquidity(order.side(), order.remaining_size())?;
        self.restamp(order);
        self.run_market(order)
    }

    fn run_market(&mut self, order: &mut Order) -> Result<Vec<Match>> {
        let matches = self.cross(order, None)?;
        debug!(
            order_id = order.id(),
            side = %order.side(),
            fills = matches.len(),
            "market order executed"
        );
        Ok(matches)
    }

    /// Place a limit order of `size` at `price` on `side`.
    ///
    /// Crosses opposite levels that are marketable against `price`, then
    /// rests any remainder at `price`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidOrder`] if `price` or `size` is not positive
    /// - [`Error::VolumeOverflow`] if `size` could not rest on `side`
    pub fn place_limit_order(
        &mut self,
        side: Side,
        price: Price,
        size: Quantity,
    ) -> Result<LimitOrderOutcome> {
        validate_price(price)?;
        self.index(side).check_capacity(size)?;
        let order = self.new_order(side, size)?;
        self.run_limit(price, order)
    }

    /// Execute a caller-held order as a limit order at `price`.
    ///
    /// The order is first given a fresh id and arrival sequence from this
    /// book, so a copied, cancelled or foreign order queues behind every
    /// order already resting at `price`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidOrder`] if `price` is not positive or the order is
    ///   filled or already resting
    /// - [`Error::VolumeOverflow`] if the order could not rest without the
    ///   side total overflowing
    pub fn execute_limit(&mut self, price: Price, mut order: Order) -> Result<LimitOrderOutcome> {
        validate_price(price)?;
        validate_aggressor(&order)?;
        self.index(order.side()).check_capacity(order.remaining_size())?;
        self.restamp(&mut order);
        self.run_limit(price, order)
    }

    /// Crossing only shrinks the opposite side and the remainder never
    /// exceeds the checked size, so resting cannot fail on capacity here.
    fn run_limit(&mut self, price: Price, mut order: Order) -> Result<LimitOrderOutcome> {
        let matches = self.cross(&mut order, Some(price))?;

        let order_id = order.id();
        let remaining = order.remaining_size();
        let resting = if order.is_filled() {
            None
        } else {
            let side = order.side();
            Some(self.index_mut(side).insert(price, order)?)
        };

        debug!(
            order_id,
            price = %price,
            fills = matches.len(),
            remaining = %remaining,
            resting = resting.is_some(),
            "limit order placed"
        );

        Ok(LimitOrderOutcome {
            order_id,
            remaining,
            resting,
            matches,
        })
    }

    /// Withdraw a resting order.
    ///
    /// Returns the order with its back-reference cleared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OrderNotResting`] if the handle names an order that is
    /// no longer resting (filled or already cancelled).
    pub fn cancel_order(&mut self, order_ref: &OrderRef) -> Result<Order> {
        let order = self
            .index_mut(order_ref.side)
            .remove_order(order_ref.price, order_ref.id)
            .ok_or_else(|| {
                warn!(order_id = order_ref.id, "cancel of order that is not resting");
                Error::OrderNotResting(order_ref.id)
            })?;

        debug!(
            order_id = order.id(),
            side = %order_ref.side,
            price = %order_ref.price,
            remaining = %order.remaining_size(),
            "order cancelled"
        );
        Ok(order)
    }

    /// Look up a resting order through its handle
    #[must_use]
    pub fn order(&self, order_ref: &OrderRef) -> Option<&Order> {
        self.index(order_ref.side)
            .get(order_ref.price)?
            .get(order_ref.id)
    }

    /// Price levels of one side
    #[must_use]
    pub fn index(&self, side: Side) -> &PriceLevelIndex {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    fn index_mut(&mut self, side: Side) -> &mut PriceLevelIndex {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    /// Level at an exact price on one side
    #[must_use]
    pub fn level(&self, side: Side, price: Price) -> Option<&PriceLevel> {
        self.index(side).get(price)
    }

    /// Get the best bid price (highest bid)
    #[must_use]
    pub fn best_bid_price(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Get the best ask price (lowest ask)
    #[must_use]
    pub fn best_ask_price(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Get the best bid as `(price, volume)`
    #[must_use]
    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        self.bids.best().map(|l| (l.price(), l.volume()))
    }

    /// Get the best ask as `(price, volume)`
    #[must_use]
    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        self.asks.best().map(|l| (l.price(), l.volume()))
    }

    /// Get the mid price
    ///
    /// Returns the average of best bid and best ask, or `None` if either is missing.
    #[must_use]
    pub fn mid_price(&self) -> Option<Price> {
        match (self.best_bid_price(), self.best_ask_price()) {
            (Some(bid), Some(ask)) => Some(bid + (ask - bid) / Decimal::TWO),
            _ => None,
        }
    }

    /// Get the spread (best ask minus best bid)
    #[must_use]
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid_price(), self.best_ask_price()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Get all bid levels, sorted by price descending (best first)
    pub fn bids(&self) -> impl Iterator<Item = &PriceLevel> + '_ {
        self.bids.iter()
    }

    /// Get all ask levels, sorted by price ascending (best first)
    pub fn asks(&self) -> impl Iterator<Item = &PriceLevel> + '_ {
        self.asks.iter()
    }

    /// Get total bid volume
    #[must_use]
    pub fn bid_total_volume(&self) -> Quantity {
        self.bids.total_volume()
    }

    /// Get total ask volume
    #[must_use]
    pub fn ask_total_volume(&self) -> Quantity {
        self.asks.total_volume()
    }

    /// Get total volume resting on `side`
    #[must_use]
    pub fn total_volume(&self, side: Side) -> Quantity {
        self.index(side).total_volume()
    }

    /// Check if the orderbook is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Get the number of price levels as `(bids, asks)`
    #[must_use]
    pub fn num_levels(&self) -> (usize, usize) {
        (self.bids.len(), self.asks.len())
    }

    /// Point-in-time copy of both sides, best price first
    #[must_use]
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot::capture(self)
    }

    fn check_liquidity(&self, side: Side, size: Quantity) -> Result<()> {
        let available = self.total_volume(side.opposite());
        if size > available {
            warn!(side = %side, requested = %size, available = %available, "market order rejected");
            return Err(Error::InsufficientLiquidity {
                side,
                requested: size,
                available,
            });
        }
        Ok(())
    }

    /// Fill `order` against the opposite side, best level first.
    ///
    /// With a `limit`, stops at the first level that is not marketable.
    /// Levels drained along the way are removed before the next is visited.
    fn cross(&mut self, order: &mut Order, limit: Option<Price>) -> Result<Vec<Match>> {
        let side = order.side().opposite();
        let opposite = self.index_mut(side);
        let mut matches = Vec::new();

        while !order.is_filled() {
            let Some(price) = opposite.best_price() else {
                break;
            };
            if limit.is_some_and(|limit| !opposite.is_marketable(price, limit)) {
                break;
            }

            matches.extend(opposite.fill(price, order)?);
        }

        Ok(matches)
    }
}

impl Default for Orderbook {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_size(size: Quantity) -> Result<()> {
    if size <= Quantity::ZERO {
        return Err(Error::invalid_order(format!("size must be positive, got {size}")));
    }
    Ok(())
}

fn validate_price(price: Price) -> Result<()> {
    if price <= Price::ZERO {
        return Err(Error::invalid_order(format!("price must be positive, got {price}")));
    }
    Ok(())
}

fn validate_aggressor(order: &Order) -> Result<()> {
    if order.is_filled() {
        return Err(Error::invalid_order(format!("order {} is already filled", order.id())));
    }
    if order.is_resting() {
        return Err(Error::invalid_order(format!("order {} is already resting", order.id())));
    }
    Ok(())
}

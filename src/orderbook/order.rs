//! Orders held by a book and the handles callers keep for them.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::types::{OrderId, Price, Quantity, Side, TimestampNs};

/// A single order, either incoming (aggressor) or resting in a price level.
///
/// Orders are created by [`Orderbook::new_order`](super::Orderbook::new_order),
/// which stamps the id and the arrival sequence. A book re-stamps any order
/// handed back to it, so ids stay unique and a re-submitted order queues as a
/// new arrival. The remaining size only ever decreases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    side: Side,
    size: Quantity,
    remaining: Quantity,
    sequence: u64,
    timestamp: TimestampNs,
    /// Price of the level on `side` currently holding this order
    level: Option<Price>,
}

impl Order {
    pub(crate) fn new(id: OrderId, sequence: u64, side: Side, size: Quantity) -> Self {
        Self {
            id,
            side,
            size,
            remaining: size,
            sequence,
            timestamp: now_ns(),
            level: None,
        }
    }

    /// Book-unique order id
    #[must_use]
    pub const fn id(&self) -> OrderId {
        self.id
    }

    /// Side of the order
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Size requested when the order was created
    #[must_use]
    pub const fn size(&self) -> Quantity {
        self.size
    }

    /// Size still open
    #[must_use]
    pub const fn remaining_size(&self) -> Quantity {
        self.remaining
    }

    /// Size executed so far
    #[must_use]
    pub fn filled_size(&self) -> Quantity {
        self.size - self.remaining
    }

    /// Arrival sequence, used for time priority within a level
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Creation time in nanoseconds since Unix epoch
    #[must_use]
    pub const fn timestamp(&self) -> TimestampNs {
        self.timestamp
    }

    /// Price of the level holding this order, if it is resting
    #[must_use]
    pub const fn level(&self) -> Option<Price> {
        self.level
    }

    /// Check if the order is resting in a price level
    #[must_use]
    pub const fn is_resting(&self) -> bool {
        self.level.is_some()
    }

    /// Check if nothing is left to execute
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Handle for this order, if it is resting
    #[must_use]
    pub fn order_ref(&self) -> Option<OrderRef> {
        self.level.map(|price| OrderRef {
            id: self.id,
            side: self.side,
            price,
        })
    }

    /// Give the order a new identity and arrival position
    pub(crate) fn restamp(&mut self, id: OrderId, sequence: u64) {
        self.id = id;
        self.sequence = sequence;
        self.timestamp = now_ns();
    }

    /// Execute `quantity` against this order
    pub(crate) fn fill(&mut self, quantity: Quantity) {
        debug_assert!(
            quantity <= self.remaining,
            "fill of {quantity} exceeds remaining {}",
            self.remaining
        );
        self.remaining -= quantity;
    }

    pub(crate) fn set_level(&mut self, price: Price) {
        self.level = Some(price);
    }

    pub(crate) fn clear_level(&mut self) {
        self.level = None;
    }
}

/// Handle to a resting order.
///
/// Carries the order's side and level price so cancellation goes straight to
/// the level that holds it. A handle can outlive the order it names; using a
/// stale handle yields [`Error::OrderNotResting`](crate::Error::OrderNotResting).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderRef {
    /// Order id
    pub id: OrderId,
    /// Side the order rests on
    pub side: Side,
    /// Price of the level holding the order
    pub price: Price,
}

fn now_ns() -> TimestampNs {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as TimestampNs)
        .unwrap_or_default()
}

//! Execution records and placement outcomes.

use serde::{Deserialize, Serialize};

use crate::types::{OrderId, Price, Quantity};

use super::order::{Order, OrderRef};

/// One execution between an ask and a bid.
///
/// The price is always the price of the resting level that was consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Id of the ask order involved
    pub ask: OrderId,
    /// Id of the bid order involved
    pub bid: OrderId,
    /// Quantity executed
    pub size_filled: Quantity,
    /// Execution price
    pub price: Price,
}

impl Match {
    /// Build a match between two orders, assigning ask/bid by each order's side
    pub(crate) fn between(a: &Order, b: &Order, size_filled: Quantity, price: Price) -> Self {
        let (ask, bid) = if a.side().is_bid() {
            (b.id(), a.id())
        } else {
            (a.id(), b.id())
        };
        Self {
            ask,
            bid,
            size_filled,
            price,
        }
    }

    /// Notional value of the execution, `None` if it is not representable
    #[must_use]
    pub fn notional(&self) -> Option<Quantity> {
        self.size_filled.checked_mul(self.price)
    }
}

/// Sum of executed size over a sequence of matches
pub fn total_filled(matches: &[Match]) -> Quantity {
    matches.iter().map(|m| m.size_filled).sum()
}

/// Result of a market order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOrderOutcome {
    /// Id assigned to the market order
    pub order_id: OrderId,
    /// Executions in the order they occurred
    pub matches: Vec<Match>,
}

/// Result of a limit order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOrderOutcome {
    /// Id assigned to the limit order
    pub order_id: OrderId,
    /// Size left after crossing (now resting, unless zero)
    pub remaining: Quantity,
    /// Handle to the resting remainder, `None` when fully filled
    pub resting: Option<OrderRef>,
    /// Executions in the order they occurred
    pub matches: Vec<Match>,
}

impl LimitOrderOutcome {
    /// Size executed while crossing
    #[must_use]
    pub fn filled(&self) -> Quantity {
        total_filled(&self.matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;
    use rust_decimal_macros::dec;

    #[test]
    fn test_between_assigns_by_side() {
        let ask = Order::new(1, 1, Side::Ask, dec!(2));
        let bid = Order::new(2, 2, Side::Bid, dec!(1));

        let m1 = Match::between(&bid, &ask, dec!(1), dec!(100));
        let m2 = Match::between(&ask, &bid, dec!(1), dec!(100));
        assert_eq!(m1, m2);
        assert_eq!(m1.ask, 1);
        assert_eq!(m1.bid, 2);
    }

    #[test]
    fn test_total_filled_and_notional() {
        let matches = [
            Match {
                ask: 1,
                bid: 9,
                size_filled: dec!(2),
                price: dec!(100),
            },
            Match {
                ask: 3,
                bid: 9,
                size_filled: dec!(0.5),
                price: dec!(120),
            },
        ];
        assert_eq!(total_filled(&matches), dec!(2.5));
        assert_eq!(matches[1].notional(), Some(dec!(60)));
    }
}

//! Serializable point-in-time views of a book.

use serde::{Deserialize, Serialize};

use crate::types::{OrderId, Price, Quantity, Side, TimestampNs};

use super::book::Orderbook;
use super::level::PriceLevel;

/// A resting order as reported to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestingOrder {
    /// Order id
    pub id: OrderId,
    /// Price of the level holding the order
    pub price: Price,
    /// Remaining size
    pub size: Quantity,
    /// Side of the order
    pub side: Side,
    /// Creation time in nanoseconds since Unix epoch
    pub timestamp: TimestampNs,
}

/// One price level with its orders in time priority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    /// Level price
    pub price: Price,
    /// Aggregate remaining size
    pub volume: Quantity,
    /// Resting orders, oldest first
    pub orders: Vec<RestingOrder>,
}

impl LevelSnapshot {
    fn capture(level: &PriceLevel) -> Self {
        Self {
            price: level.price(),
            volume: level.volume(),
            orders: level
                .orders()
                .map(|o| RestingOrder {
                    id: o.id(),
                    price: level.price(),
                    size: o.remaining_size(),
                    side: o.side(),
                    timestamp: o.timestamp(),
                })
                .collect(),
        }
    }
}

/// Both sides of a book, each best price first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// Ask levels, lowest price first
    pub asks: Vec<LevelSnapshot>,
    /// Bid levels, highest price first
    pub bids: Vec<LevelSnapshot>,
}

/// Per-order view of a book without level grouping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatBook {
    /// Resting asks, best price then oldest first
    pub asks: Vec<RestingOrder>,
    /// Resting bids, best price then oldest first
    pub bids: Vec<RestingOrder>,
}

impl BookSnapshot {
    /// Copy the current state of `book`
    #[must_use]
    pub fn capture(book: &Orderbook) -> Self {
        Self {
            asks: book.asks().map(LevelSnapshot::capture).collect(),
            bids: book.bids().map(LevelSnapshot::capture).collect(),
        }
    }

    /// Levels of one side
    #[must_use]
    pub fn side(&self, side: Side) -> &[LevelSnapshot] {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// Flatten levels into per-order lists
    #[must_use]
    pub fn flatten(&self) -> FlatBook {
        let flat = |levels: &[LevelSnapshot]| -> Vec<RestingOrder> {
            levels
                .iter()
                .flat_map(|l| l.orders.iter().cloned())
                .collect()
        };
        FlatBook {
            asks: flat(&self.asks),
            bids: flat(&self.bids),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_book() -> Orderbook {
        let mut book = Orderbook::new();
        book.place_limit_order(Side::Ask, dec!(110), dec!(1)).unwrap();
        book.place_limit_order(Side::Ask, dec!(100), dec!(2)).unwrap();
        book.place_limit_order(Side::Ask, dec!(100), dec!(3)).unwrap();
        book.place_limit_order(Side::Bid, dec!(90), dec!(4)).unwrap();
        book
    }

    #[test]
    fn test_capture_orders_levels() {
        let snapshot = sample_book().snapshot();

        let asks: Vec<_> = snapshot.asks.iter().map(|l| (l.price, l.volume)).collect();
        assert_eq!(asks, vec![(dec!(100), dec!(5)), (dec!(110), dec!(1))]);
        assert_eq!(snapshot.side(Side::Bid).len(), 1);

        let sizes: Vec<_> = snapshot.asks[0].orders.iter().map(|o| o.size).collect();
        assert_eq!(sizes, vec![dec!(2), dec!(3)]);
    }

    #[test]
    fn test_flatten() {
        let flat = sample_book().snapshot().flatten();
        let asks: Vec<_> = flat.asks.iter().map(|o| (o.price, o.size)).collect();
        assert_eq!(
            asks,
            vec![(dec!(100), dec!(2)), (dec!(100), dec!(3)), (dec!(110), dec!(1))]
        );
        assert_eq!(flat.bids.len(), 1);
        assert_eq!(flat.bids[0].side, Side::Bid);
    }

    #[test]
    fn test_json_shape() {
        let snapshot = sample_book().snapshot();
        let value = serde_json::to_value(&snapshot).unwrap();

        let order = &value["bids"][0]["orders"][0];
        assert_eq!(order["price"], "90");
        assert_eq!(order["size"], "4");
        assert_eq!(order["side"], "bid");
        assert!(order["timestamp"].is_i64());

        let back: BookSnapshot = serde_json::from_value(value).unwrap();
        assert_eq!(back, snapshot);
    }
}

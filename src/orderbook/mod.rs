//! Limit order book and matching.
//!
//! This module holds the resting orders of one instrument and matches
//! incoming orders by price-time priority:
//!
//! - **Price priority**: lower asks and higher bids fill first
//! - **Time priority**: within a price level, earlier arrivals fill first
//! - Every execution is priced at the resting level's price
//!
//! # Example
//!
//! ```rust
//! use limit_orderbook::orderbook::Orderbook;
//! use limit_orderbook::types::Side;
//! use rust_decimal::Decimal;
//!
//! let mut book = Orderbook::new();
//!
//! book.place_limit_order(Side::Ask, Decimal::from(100), Decimal::from(20))?;
//! book.place_limit_order(Side::Ask, Decimal::from(200), Decimal::from(5))?;
//!
//! let outcome = book.place_market_order(Side::Bid, Decimal::from(15))?;
//! assert_eq!(outcome.matches.len(), 1);
//! assert_eq!(book.best_ask(), Some((Decimal::from(100), Decimal::from(5))));
//! # Ok::<(), limit_orderbook::Error>(())
//! ```

pub mod book;
pub mod index;
pub mod level;
pub mod order;
pub mod snapshot;
pub mod trade;

pub use book::Orderbook;
pub use index::PriceLevelIndex;
pub use level::PriceLevel;
pub use order::{Order, OrderRef};
pub use snapshot::{BookSnapshot, FlatBook, LevelSnapshot, RestingOrder};
pub use trade::{total_filled, LimitOrderOutcome, MarketOrderOutcome, Match};

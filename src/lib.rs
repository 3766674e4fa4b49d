//! # limit-orderbook
//!
//! A single-instrument limit order book that matches bids and asks by
//! price-time priority.
//!
//! ## Features
//!
//! - **Market orders** - Walk the opposite side best price first, or fail
//!   without touching the book if liquidity is short
//! - **Limit orders** - Cross whatever is marketable, rest the remainder
//! - **Cancellation** - Through a copyable [`OrderRef`](orderbook::OrderRef)
//!   handle, with double-cancel detection
//! - **Snapshots** - Serializable, best price first, orders in time priority
//!
//! ## Quick Start
//!
//! ```rust
//! use limit_orderbook::orderbook::Orderbook;
//! use limit_orderbook::types::Side;
//! use rust_decimal::Decimal;
//!
//! let mut book = Orderbook::new();
//!
//! // Rest an ask of 2 at 120
//! let ask = book.place_limit_order(Side::Ask, Decimal::from(120), Decimal::from(2))?;
//!
//! // A bid limited at 120 for 1.5 crosses it and does not rest
//! let bid = book.place_limit_order(Side::Bid, Decimal::from(120), Decimal::new(15, 1))?;
//! assert!(bid.resting.is_none());
//! assert_eq!(bid.matches[0].price, Decimal::from(120));
//!
//! // Cancel what is left of the ask
//! let cancelled = book.cancel_order(&ask.resting.unwrap())?;
//! assert_eq!(cancelled.remaining_size(), Decimal::new(5, 1));
//! # Ok::<(), limit_orderbook::Error>(())
//! ```
//!
//! ## Architecture
//!
//! This crate is organized into several modules:
//!
//! - [`orderbook`] - Orders, price levels, the per-side index and the book
//! - [`exchange`] - One lock-protected book per market symbol
//! - [`engine`] - A tokio task owning one book, driven over channels
//! - [`types`] - Prices, sizes, sides and order requests
//! - [`config`] - Markets and engine settings
//! - [`error`] - Error types for the crate
//!
//! ## Concurrency
//!
//! A book is single-writer. Share it through [`exchange::Exchange`] (one
//! `RwLock` per market) or hand it to [`engine::spawn`]; both serialize every
//! operation on a given book.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod exchange;
pub mod orderbook;
pub mod types;

// Re-export main types at crate root for convenience
pub use config::Config;
pub use error::Error;
pub use exchange::Exchange;
pub use orderbook::Orderbook;

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_from_default_config() {
        let exchange = Exchange::new(&Config::default()).unwrap();
        assert_eq!(exchange.len(), 2);
    }
}

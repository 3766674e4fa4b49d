//! Multi-market exchange routing requests to one book per market.
//!
//! This module provides [`Exchange`], a thread-safe container mapping market
//! symbols to orderbooks.
//!
//! # Design
//!
//! Each book sits behind its own `parking_lot::RwLock`. Every mutation takes
//! that book's write lock for the whole operation, so one order is matched at
//! a time per market while different markets proceed independently. Reads
//! take the read lock and therefore never observe a half-applied order.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Error;
use crate::orderbook::{BookSnapshot, Match, Order, OrderRef, Orderbook};
use crate::types::{OrderId, OrderType, PlaceOrderRequest, Price};
use crate::Result;

/// Result of a placed order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrderResponse {
    /// Market the order was routed to
    pub market: String,
    /// Id assigned by the market's book
    pub order_id: OrderId,
    /// Handle to the resting remainder of a limit order
    pub resting: Option<OrderRef>,
    /// Executions in the order they occurred
    pub matches: Vec<Match>,
}

/// Books for several markets, keyed by symbol.
///
/// # Thread Safety
///
/// The exchange is safe to share across threads via `Arc<Exchange>`.
///
/// # Example
///
/// ```rust
/// use limit_orderbook::exchange::Exchange;
/// use limit_orderbook::types::{PlaceOrderRequest, Side};
/// use limit_orderbook::Config;
/// use rust_decimal::Decimal;
///
/// let exchange = Exchange::new(&Config::new())?;
///
/// let ask = PlaceOrderRequest::limit("ETH", Side::Ask, Decimal::from(100), Decimal::from(2));
/// exchange.place_order(&ask)?;
///
/// let bid = PlaceOrderRequest::market("ETH", Side::Bid, Decimal::from(1));
/// let response = exchange.place_order(&bid)?;
/// assert_eq!(response.matches.len(), 1);
/// # Ok::<(), limit_orderbook::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct Exchange {
    /// Orderbooks by market symbol
    books: RwLock<FxHashMap<String, RwLock<Orderbook>>>,
}

impl Exchange {
    /// Create an exchange with an empty book for every configured market
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let exchange = Self::default();
        for market in config.markets() {
            exchange.add_market(market.clone());
        }
        Ok(exchange)
    }

    /// Add a market with an empty book
    ///
    /// Returns `false` if the market already existed; its book is kept.
    pub fn add_market(&self, market: impl Into<String>) -> bool {
        let market = market.into();
        let mut books = self.books.write();
        if books.contains_key(&market) {
            return false;
        }
        info!(market = %market, "market opened");
        books.insert(market, RwLock::new(Orderbook::new()));
        true
    }

    /// Remove a market, returning its book
    pub fn remove_market(&self, market: &str) -> Option<Orderbook> {
        let removed = self.books.write().remove(market)?;
        info!(market = %market, "market closed");
        Some(removed.into_inner())
    }

    /// Check if a market is registered
    pub fn has_market(&self, market: &str) -> bool {
        self.books.read().contains_key(market)
    }

    /// Get all market symbols, sorted
    pub fn markets(&self) -> Vec<String> {
        let mut markets: Vec<_> = self.books.read().keys().cloned().collect();
        markets.sort();
        markets
    }

    /// Get number of markets
    pub fn len(&self) -> usize {
        self.books.read().len()
    }

    /// Check if no market is registered
    pub fn is_empty(&self) -> bool {
        self.books.read().is_empty()
    }

    /// Route an order request to its market's book
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownMarket`] if the market is not registered
    /// - [`Error::InvalidOrder`] for a limit request without a price, or any
    ///   size/price the book rejects
    /// - [`Error::InsufficientLiquidity`] for a market order larger than the
    ///   opposite side
    pub fn place_order(&self, request: &PlaceOrderRequest) -> Result<PlaceOrderResponse> {
        let side = request.side();
        let response = self.with_book_mut(&request.market, |book| match request.order_type {
            OrderType::Market => {
                let outcome = book.place_market_order(side, request.size)?;
                Ok((outcome.order_id, None, outcome.matches))
            }
            OrderType::Limit => {
                let price = request
                    .price
                    .ok_or_else(|| Error::invalid_order("limit order requires a price"))?;
                let outcome = book.place_limit_order(side, price, request.size)?;
                Ok((outcome.order_id, outcome.resting, outcome.matches))
            }
        });

        match response {
            Ok((order_id, resting, matches)) => Ok(PlaceOrderResponse {
                market: request.market.clone(),
                order_id,
                resting,
                matches,
            }),
            Err(err) => {
                warn!(market = %request.market, error = %err, "order rejected");
                Err(err)
            }
        }
    }

    /// Decode a JSON order request and route it
    ///
    /// # Errors
    ///
    /// [`Error::Json`] for a malformed body, otherwise as for
    /// [`place_order`](Self::place_order).
    pub fn place_order_json(&self, body: &str) -> Result<PlaceOrderResponse> {
        let request = PlaceOrderRequest::from_json(body).map_err(|err| {
            warn!(error = %err, "order request rejected");
            err
        })?;
        self.place_order(&request)
    }

    /// Cancel a resting order on a market
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMarket`] or [`Error::OrderNotResting`].
    pub fn cancel_order(&self, market: &str, order_ref: &OrderRef) -> Result<Order> {
        self.with_book_mut(market, |book| book.cancel_order(order_ref))
    }

    /// Snapshot a market's book
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMarket`] if the market is not registered.
    pub fn snapshot(&self, market: &str) -> Result<BookSnapshot> {
        self.with_book(market, |book| Ok(book.snapshot()))
    }

    /// Get the best bid price of a market
    pub fn best_bid(&self, market: &str) -> Option<Price> {
        self.with_book(market, |book| Ok(book.best_bid_price()))
            .ok()
            .flatten()
    }

    /// Get the best ask price of a market
    pub fn best_ask(&self, market: &str) -> Option<Price> {
        self.with_book(market, |book| Ok(book.best_ask_price()))
            .ok()
            .flatten()
    }

    /// Run `f` with shared access to a market's book
    pub fn with_book<T>(&self, market: &str, f: impl FnOnce(&Orderbook) -> Result<T>) -> Result<T> {
        let books = self.books.read();
        let book = books
            .get(market)
            .ok_or_else(|| Error::UnknownMarket(market.to_string()))?;
        let guard = book.read();
        f(&*guard)
    }

    /// Run `f` with exclusive access to a market's book
    pub fn with_book_mut<T>(
        &self,
        market: &str,
        f: impl FnOnce(&mut Orderbook) -> Result<T>,
    ) -> Result<T> {
        let books = self.books.read();
        let book = books
            .get(market)
            .ok_or_else(|| Error::UnknownMarket(market.to_string()))?;
        let mut guard = book.write();
        f(&mut *guard)
    }
}

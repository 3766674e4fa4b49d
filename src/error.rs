//! Error types for the limit-orderbook crate.
//!
//! Every failure in this crate is recoverable and returned to the immediate
//! caller. A rejected operation never leaves a book partially mutated.

use thiserror::Error;

use crate::types::{OrderId, Price, Quantity, Side};

/// The main error type for this crate
#[derive(Debug, Error)]
pub enum Error {
    /// Market order size exceeds the volume resting on the opposite side
    #[error("not enough volume [available: {available}] for {side} market order [size: {requested}]")]
    InsufficientLiquidity {
        /// Side of the incoming market order
        side: Side,
        /// Size requested by the market order
        requested: Quantity,
        /// Total volume available on the opposite side
        available: Quantity,
    },

    /// Non-positive size or price, or an order that cannot be placed
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// Resting the order would push a side's total volume past the largest
    /// representable quantity
    #[error("{side} volume would exceed the maximum representable quantity")]
    VolumeOverflow {
        /// Side that would overflow
        side: Side,
    },

    /// Cancellation target is not resting in any price level
    #[error("order {0} is not resting on the book")]
    OrderNotResting(OrderId),

    /// Book internals disagree about an active price level
    ///
    /// Indicates a bug, never a normal runtime condition.
    #[error("unknown {side} price level {price}")]
    UnknownPriceLevel {
        /// Side of the missing level
        side: Side,
        /// Price of the missing level
        price: Price,
    },

    /// No book is registered for the market symbol
    #[error("market not found: {0}")]
    UnknownMarket(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// The engine task owning the book has stopped
    #[error("book engine is closed")]
    EngineClosed,

    /// Malformed JSON order request
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an [`Error::InvalidOrder`] from any message
    pub fn invalid_order(msg: impl Into<String>) -> Self {
        Error::InvalidOrder(msg.into())
    }

    /// Check if the error was caused by the caller's input
    ///
    /// Returns `false` for internal consistency failures and infrastructure
    /// errors.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Error::InsufficientLiquidity { .. }
                | Error::InvalidOrder(_)
                | Error::OrderNotResting(_)
                | Error::VolumeOverflow { .. }
                | Error::UnknownMarket(_)
                | Error::Json(_)
        )
    }
}

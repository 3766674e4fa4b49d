//! Order-related types.
//!
//! This module contains the side of an order and the request shape the
//! exchange layer accepts from clients.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Price, Quantity};
use crate::Result;

/// Order side (bid or ask)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy side
    Bid,
    /// Sell side
    Ask,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    /// Build a side from the `bid` flag used in requests
    pub fn from_bid(bid: bool) -> Self {
        if bid {
            Side::Bid
        } else {
            Side::Ask
        }
    }

    /// Check if this is the buy side
    pub fn is_bid(self) -> bool {
        self == Side::Bid
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "bid"),
            Side::Ask => write!(f, "ask"),
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Limit order - cross what is marketable, rest the remainder
    #[default]
    Limit,
    /// Market order - consume opposite liquidity best price first
    Market,
}

/// Request to place an order on a market
///
/// Matches the JSON body clients send:
///
/// ```json
/// {"type": "LIMIT", "bid": true, "size": "1.5", "price": "120", "market": "ETH"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    /// Order type (limit or market)
    #[serde(rename = "type")]
    pub order_type: OrderType,

    /// `true` for a bid, `false` for an ask
    pub bid: bool,

    /// Requested size
    pub size: Quantity,

    /// Limit price (required for limit orders, ignored for market orders)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,

    /// Market symbol
    pub market: String,
}

impl PlaceOrderRequest {
    /// Create a new limit order request
    pub fn limit(market: impl Into<String>, side: Side, price: Price, size: Quantity) -> Self {
        Self {
            order_type: OrderType::Limit,
            bid: side.is_bid(),
            size,
            price: Some(price),
            market: market.into(),
        }
    }

    /// Create a new market order request
    pub fn market(market: impl Into<String>, side: Side, size: Quantity) -> Self {
        Self {
            order_type: OrderType::Market,
            bid: side.is_bid(),
            size,
            price: None,
            market: market.into(),
        }
    }

    /// Decode a request from a client's JSON body
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if the body is malformed.
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Side of the requested order
    pub fn side(&self) -> Side {
        Side::from_bid(self.bid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Bid.opposite(), Side::Ask);
        assert_eq!(Side::Ask.opposite(), Side::Bid);
    }

    #[test]
    fn test_create_limit_request() {
        let req = PlaceOrderRequest::limit("ETH", Side::Bid, dec!(120), dec!(1.5));
        assert_eq!(req.market, "ETH");
        assert_eq!(req.side(), Side::Bid);
        assert_eq!(req.order_type, OrderType::Limit);
        assert_eq!(req.price, Some(dec!(120)));
    }

    #[test]
    fn test_create_market_request() {
        let req = PlaceOrderRequest::market("BTC", Side::Ask, dec!(3));
        assert_eq!(req.order_type, OrderType::Market);
        assert_eq!(req.price, None);
        assert!(!req.bid);
    }

    #[test]
    fn test_serde_side() {
        let json = serde_json::to_string(&Side::Bid).unwrap();
        assert_eq!(json, "\"bid\"");

        let side: Side = serde_json::from_str("\"ask\"").unwrap();
        assert_eq!(side, Side::Ask);
    }

    #[test]
    fn test_deserialize_request() {
        let json = r#"{"type":"MARKET","bid":false,"size":"5.5","market":"ETH"}"#;
        let req: PlaceOrderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.order_type, OrderType::Market);
        assert_eq!(req.side(), Side::Ask);
        assert_eq!(req.size, dec!(5.5));
        assert_eq!(req.price, None);
    }

    #[test]
    fn test_from_json_rejects_malformed_body() {
        let err = PlaceOrderRequest::from_json(r#"{"type":"STOP","bid":true}"#).unwrap_err();
        assert!(matches!(err, crate::Error::Json(_)));

        let req = PlaceOrderRequest::from_json(
            r#"{"type":"LIMIT","bid":true,"size":"2","price":"99","market":"BTC"}"#,
        )
        .unwrap();
        assert_eq!(req.price, Some(dec!(99)));
    }
}

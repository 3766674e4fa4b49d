//! Shared types for orders and requests.
//!
//! - [`order`] - Order side, order type and the placement request
//!   accepted by the [`Exchange`](crate::exchange::Exchange)

pub mod order;

pub use order::{OrderType, PlaceOrderRequest, Side};

/// Price of a level
///
/// Using `Decimal` instead of floating point for:
/// - Exact arithmetic (no floating point errors)
/// - Exact equality, so prices can key a `BTreeMap`
pub type Price = rust_decimal::Decimal;

/// Size of an order or a fill
pub type Quantity = rust_decimal::Decimal;

/// Book-unique order identifier
pub type OrderId = u64;

/// Timestamp in nanoseconds since Unix epoch
pub type TimestampNs = i64;

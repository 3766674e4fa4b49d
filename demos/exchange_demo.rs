//! Exchange walkthrough - places orders on two markets and prints the books
//!
//! Usage:
//!   cargo run --example exchange_demo
//!
//! Optional:
//!   RUST_LOG=limit_orderbook=debug  # Show every fill and level change

use limit_orderbook::exchange::Exchange;
use limit_orderbook::types::{PlaceOrderRequest, Side};
use limit_orderbook::Config;
use rust_decimal::Decimal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("limit_orderbook=info".parse()?),
        )
        .init();

    let exchange = Exchange::new(&Config::new())?;
    println!("Markets: {:?}", exchange.markets());

    // Resting asks: 2@100, 3@100, 1@120
    for (price, size) in [(100, 2), (100, 3), (120, 1)] {
        let req = PlaceOrderRequest::limit("ETH", Side::Ask, Decimal::from(price), Decimal::from(size));
        exchange.place_order(&req)?;
    }

    // Market bid for 5.5 sweeps the 100 level and takes 0.5 at 120
    let req = PlaceOrderRequest::market("ETH", Side::Bid, Decimal::new(55, 1));
    let response = exchange.place_order(&req)?;
    for m in &response.matches {
        println!(
            "match: ask #{} / bid #{} {} @ {}",
            m.ask, m.bid, m.size_filled, m.price
        );
    }

    // A rejected order is reported, not fatal
    let req = PlaceOrderRequest::market("ETH", Side::Bid, Decimal::from(10));
    if let Err(err) = exchange.place_order(&req) {
        println!("rejected: {err}");
    }

    // Rest a bid on BTC and cancel it twice
    let req = PlaceOrderRequest::limit("BTC", Side::Bid, Decimal::from(30_000), Decimal::ONE);
    let response = exchange.place_order(&req)?;
    if let Some(handle) = response.resting {
        exchange.cancel_order("BTC", &handle)?;
        if let Err(err) = exchange.cancel_order("BTC", &handle) {
            println!("second cancel: {err}");
        }
    }

    let book = exchange.snapshot("ETH")?.flatten();
    println!("ETH book: {}", serde_json::to_string_pretty(&book)?);

    Ok(())
}

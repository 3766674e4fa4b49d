//! Property tests for book invariants.
//!
//! Random sequences of limit, market and cancel operations are replayed
//! against a book; after every step the level volumes, level membership and
//! fill accounting must hold.

use limit_orderbook::orderbook::{total_filled, OrderRef, Orderbook};
use limit_orderbook::types::Side;
use limit_orderbook::Error;
use proptest::prelude::*;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
enum Op {
    Limit { bid: bool, price: u32, size: u32 },
    Market { bid: bool, size: u32 },
    Cancel { pick: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<bool>(), 95u32..=105, 1u32..=20)
            .prop_map(|(bid, price, size)| Op::Limit { bid, price, size }),
        1 => (any::<bool>(), 1u32..=30).prop_map(|(bid, size)| Op::Market { bid, size }),
        1 => any::<usize>().prop_map(|pick| Op::Cancel { pick }),
    ]
}

/// Sizes in tenths, so fills split fractional quantities
fn size(tenths: u32) -> Decimal {
    Decimal::new(i64::from(tenths), 1)
}

fn check_invariants(book: &Orderbook) {
    for side in [Side::Bid, Side::Ask] {
        let mut last_price: Option<Decimal> = None;
        for level in book.index(side).iter() {
            assert!(!level.is_empty(), "empty level left in index");

            let sum: Decimal = level.orders().map(|o| o.remaining_size()).sum();
            assert_eq!(sum, level.volume());

            let sequences: Vec<_> = level.orders().map(|o| o.sequence()).collect();
            assert!(sequences.windows(2).all(|w| w[0] < w[1]));

            for order in level.orders() {
                assert!(!order.is_filled());
                assert_eq!(order.level(), Some(level.price()));
            }

            if let Some(prev) = last_price {
                match side {
                    Side::Bid => assert!(level.price() < prev),
                    Side::Ask => assert!(level.price() > prev),
                }
            }
            last_price = Some(level.price());
        }
    }

    if let (Some(bid), Some(ask)) = (book.best_bid_price(), book.best_ask_price()) {
        assert!(bid < ask, "limit placement left a crossed book");
    }
}

proptest! {
    #[test]
    fn prop_book_invariants(ops in prop::collection::vec(op(), 1..80)) {
        let mut book = Orderbook::new();
        let mut handles: Vec<OrderRef> = Vec::new();

        for step in ops {
            let before = book.bid_total_volume() + book.ask_total_volume();

            match step {
                Op::Limit { bid, price, size: tenths } => {
                    let side = Side::from_bid(bid);
                    let outcome = book
                        .place_limit_order(side, Decimal::from(price), size(tenths))
                        .unwrap();
                    let filled = total_filled(&outcome.matches);
                    prop_assert_eq!(filled + outcome.remaining, size(tenths));

                    let after = book.bid_total_volume() + book.ask_total_volume();
                    prop_assert_eq!(after, before - filled + outcome.remaining);
                    handles.extend(outcome.resting);
                }
                Op::Market { bid, size: tenths } => {
                    let side = Side::from_bid(bid);
                    let available = book.total_volume(side.opposite());
                    match book.place_market_order(side, size(tenths)) {
                        Ok(outcome) => {
                            prop_assert_eq!(total_filled(&outcome.matches), size(tenths));
                            prop_assert_eq!(
                                book.total_volume(side.opposite()),
                                available - size(tenths)
                            );

                            // Price priority: execution prices never improve
                            for pair in outcome.matches.windows(2) {
                                match side {
                                    Side::Bid => prop_assert!(pair[0].price <= pair[1].price),
                                    Side::Ask => prop_assert!(pair[0].price >= pair[1].price),
                                }
                            }
                        }
                        Err(_) => {
                            prop_assert!(size(tenths) > available);
                            prop_assert_eq!(book.bid_total_volume() + book.ask_total_volume(), before);
                        }
                    }
                }
                Op::Cancel { pick } => {
                    if !handles.is_empty() {
                        let handle = handles.swap_remove(pick % handles.len());
                        let resting = book.order(&handle).map(|o| o.remaining_size());
                        match (book.cancel_order(&handle), resting) {
                            (Ok(order), Some(remaining)) => {
                                prop_assert_eq!(order.remaining_size(), remaining);
                                prop_assert_eq!(
                                    book.bid_total_volume() + book.ask_total_volume(),
                                    before - remaining
                                );
                            }
                            (Err(_), None) => {}
                            (result, resting) => {
                                prop_assert!(false, "cancel {:?} with resting {:?}", result, resting);
                            }
                        }
                    }
                }
            }

            check_invariants(&book);
        }
    }

    #[test]
    fn prop_huge_sizes_are_rejected_not_fatal(
        steps in prop::collection::vec((any::<bool>(), any::<bool>(), 1u32..=5, 99u32..=101), 1..40)
    ) {
        let mut book = Orderbook::new();

        for (limit, bid, divisor, price) in steps {
            let side = Side::from_bid(bid);
            let size = Decimal::MAX / Decimal::from(divisor);
            let before = book.snapshot();

            let result = if limit {
                book.place_limit_order(side, Decimal::from(price), size).map(|_| ())
            } else {
                book.place_market_order(side, size).map(|_| ())
            };

            match result {
                Ok(()) => {}
                Err(Error::VolumeOverflow { .. } | Error::InsufficientLiquidity { .. }) => {
                    prop_assert_eq!(book.snapshot(), before);
                }
                Err(err) => prop_assert!(false, "unexpected error {}", err),
            }

            check_invariants(&book);
        }
    }

    #[test]
    fn prop_time_priority_within_level(sizes in prop::collection::vec(1u32..=10, 2..12)) {
        let mut book = Orderbook::new();
        let ids: Vec<_> = sizes
            .iter()
            .map(|&s| book.place_limit_order(Side::Ask, Decimal::from(100), size(s)).unwrap().order_id)
            .collect();

        let total: Decimal = sizes.iter().map(|&s| size(s)).sum();
        let outcome = book.place_market_order(Side::Bid, total).unwrap();

        let filled_ids: Vec<_> = outcome.matches.iter().map(|m| m.ask).collect();
        prop_assert_eq!(filled_ids, ids);
        prop_assert!(book.is_empty());
    }
}

//! Benchmarks for orderbook operations.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use limit_orderbook::orderbook::Orderbook;
use limit_orderbook::types::Side;
use rust_decimal::Decimal;

/// Book with `levels` ask levels of `per_level` orders, each of size 1
fn populated(levels: u32, per_level: u32) -> Orderbook {
    let mut book = Orderbook::new();
    for i in 0..levels {
        for _ in 0..per_level {
            book.place_limit_order(Side::Ask, Decimal::from(1000 + i), Decimal::ONE)
                .unwrap();
        }
    }
    book
}

fn bench_market_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("market_sweep");

    for levels in [10u32, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(levels), levels, |b, &levels| {
            let book = populated(levels, 4);
            let size = Decimal::from(levels * 2);

            b.iter_batched(
                || book.clone(),
                |mut book| {
                    // Consumes half the side
                    black_box(book.place_market_order(Side::Bid, size).unwrap());
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_limit_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("limit_insert");

    for levels in [10u32, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(levels), levels, |b, &levels| {
            let mut book = populated(levels, 1);
            let mut i = 0u32;

            b.iter(|| {
                // Non-crossing bids spread below the asks
                let price = Decimal::from(1 + i % 900);
                i = i.wrapping_add(1);
                black_box(
                    book.place_limit_order(Side::Bid, black_box(price), Decimal::ONE)
                        .unwrap(),
                );
            });
        });
    }

    group.finish();
}

fn bench_best_price(c: &mut Criterion) {
    let book = populated(1000, 1);

    c.bench_function("best_ask_price", |b| {
        b.iter(|| {
            black_box(book.best_ask_price());
        });
    });
}

criterion_group!(
    benches,
    bench_market_sweep,
    bench_limit_insert,
    bench_best_price
);
criterion_main!(benches);

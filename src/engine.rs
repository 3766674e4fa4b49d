//! Book engine: one tokio task owning one book.
//!
//! [`spawn`] moves an [`Orderbook`] into a dedicated task that applies
//! commands one at a time, in the order they were sent. Callers talk to it
//! through a cloneable [`EngineHandle`]; replies come back on `oneshot`
//! channels. Because only the task touches the book, no lock is needed and
//! every reply reflects a fully applied command.
//!
//! # Example
//!
//! ```rust
//! use limit_orderbook::engine;
//! use limit_orderbook::orderbook::Orderbook;
//! use limit_orderbook::types::Side;
//! use rust_decimal::Decimal;
//!
//! # #[tokio::main]
//! # async fn main() -> limit_orderbook::Result<()> {
//! let handle = engine::spawn(Orderbook::new(), 64);
//!
//! handle.place_limit_order(Side::Ask, Decimal::from(100), Decimal::from(2)).await?;
//! let outcome = handle.place_market_order(Side::Bid, Decimal::from(1)).await?;
//! assert_eq!(outcome.matches.len(), 1);
//! # Ok(())
//! # }
//! ```

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::info;

use crate::error::Error;
use crate::orderbook::{
    BookSnapshot, LimitOrderOutcome, MarketOrderOutcome, Order, OrderRef, Orderbook,
};
use crate::types::{Price, Quantity, Side};
use crate::Result;

type Reply<T> = oneshot::Sender<Result<T>>;

/// Commands accepted by the engine task
#[derive(Debug)]
enum Command {
    Market {
        side: Side,
        size: Quantity,
        reply: Reply<MarketOrderOutcome>,
    },
    Limit {
        side: Side,
        price: Price,
        size: Quantity,
        reply: Reply<LimitOrderOutcome>,
    },
    Cancel {
        order_ref: OrderRef,
        reply: Reply<Order>,
    },
    Snapshot {
        reply: Reply<BookSnapshot>,
    },
    BestPrices {
        reply: Reply<(Option<Price>, Option<Price>)>,
    },
}

/// Cloneable handle to a running book engine.
///
/// The task stops once every handle has been dropped; the final book is
/// returned from the task's [`JoinHandle`] (see [`spawn_with_join`]).
#[derive(Debug, Clone)]
pub struct EngineHandle {
    commands: mpsc::Sender<Command>,
}

/// Start an engine task for `book` with a command channel of `buffer` slots
///
/// Must be called from within a tokio runtime. A `buffer` of zero is raised
/// to one.
pub fn spawn(book: Orderbook, buffer: usize) -> EngineHandle {
    spawn_with_join(book, buffer).0
}

/// Start an engine task and also return its join handle, which yields the
/// book after the last [`EngineHandle`] is dropped
pub fn spawn_with_join(book: Orderbook, buffer: usize) -> (EngineHandle, JoinHandle<Orderbook>) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    let task = tokio::spawn(run(book, rx));
    info!(buffer, "book engine started");
    (EngineHandle { commands: tx }, task)
}

async fn run(mut book: Orderbook, mut commands: mpsc::Receiver<Command>) -> Orderbook {
    while let Some(command) = commands.recv().await {
        // A dropped reply receiver only means the caller stopped waiting.
        match command {
            Command::Market { side, size, reply } => {
                let _ = reply.send(book.place_market_order(side, size));
            }
            Command::Limit {
                side,
                price,
                size,
                reply,
            } => {
                let _ = reply.send(book.place_limit_order(side, price, size));
            }
            Command::Cancel { order_ref, reply } => {
                let _ = reply.send(book.cancel_order(&order_ref));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(Ok(book.snapshot()));
            }
            Command::BestPrices { reply } => {
                let _ = reply.send(Ok((book.best_bid_price(), book.best_ask_price())));
            }
        }
    }
    info!("book engine stopped");
    book
}

impl EngineHandle {
    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(build(tx))
            .await
            .map_err(|_| Error::EngineClosed)?;
        rx.await.map_err(|_| Error::EngineClosed)?
    }

    /// Place a market order
    ///
    /// # Errors
    ///
    /// Book errors as for [`Orderbook::place_market_order`], or
    /// [`Error::EngineClosed`] if the task has stopped.
    pub async fn place_market_order(&self, side: Side, size: Quantity) -> Result<MarketOrderOutcome> {
        self.request(|reply| Command::Market { side, size, reply })
            .await
    }

    /// Place a limit order
    ///
    /// # Errors
    ///
    /// Book errors as for [`Orderbook::place_limit_order`], or
    /// [`Error::EngineClosed`] if the task has stopped.
    pub async fn place_limit_order(
        &self,
        side: Side,
        price: Price,
        size: Quantity,
    ) -> Result<LimitOrderOutcome> {
        self.request(|reply| Command::Limit {
            side,
            price,
            size,
            reply,
        })
        .await
    }

    /// Cancel a resting order
    ///
    /// # Errors
    ///
    /// [`Error::OrderNotResting`] for a stale handle, or
    /// [`Error::EngineClosed`] if the task has stopped.
    pub async fn cancel_order(&self, order_ref: OrderRef) -> Result<Order> {
        self.request(|reply| Command::Cancel { order_ref, reply })
            .await
    }

    /// Snapshot the book
    pub async fn snapshot(&self) -> Result<BookSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Best bid and best ask prices
    pub async fn best_prices(&self) -> Result<(Option<Price>, Option<Price>)> {
        self.request(|reply| Command::BestPrices { reply }).await
    }

    /// Check if the engine task has stopped
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_commands_apply_in_order() {
        let handle = spawn(Orderbook::new(), 8);

        let ask = handle
            .place_limit_order(Side::Ask, dec!(120), dec!(2))
            .await
            .unwrap();
        let outcome = handle
            .place_market_order(Side::Bid, dec!(1.5))
            .await
            .unwrap();

        assert_eq!(outcome.matches[0].ask, ask.order_id);
        assert_eq!(
            handle.best_prices().await.unwrap(),
            (None, Some(dec!(120)))
        );
    }

    #[tokio::test]
    async fn test_errors_are_returned() {
        let handle = spawn(Orderbook::new(), 8);
        let err = handle
            .place_market_order(Side::Ask, dec!(1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientLiquidity { .. }));
    }

    #[tokio::test]
    async fn test_join_returns_book() {
        let (handle, task) = spawn_with_join(Orderbook::new(), 0);
        handle
            .place_limit_order(Side::Bid, dec!(10), dec!(1))
            .await
            .unwrap();
        drop(handle);

        let book = task.await.unwrap();
        assert_eq!(book.best_bid(), Some((dec!(10), dec!(1))));
    }

    #[tokio::test]
    async fn test_closed_engine() {
        let (handle, task) = spawn_with_join(Orderbook::new(), 4);
        task.abort();
        let _ = task.await;

        assert!(handle.is_closed());
        assert!(matches!(
            handle.snapshot().await,
            Err(Error::EngineClosed)
        ));
    }
}

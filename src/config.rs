//! Configuration for the exchange and book engines.
//!
//! This module provides the [`Config`] struct listing the markets to open and
//! engine settings.

use rustc_hash::FxHashSet;

use crate::error::Error;

/// Markets opened when no list is configured
pub const DEFAULT_MARKETS: [&str; 2] = ["ETH", "BTC"];

/// Default capacity of an engine's command channel
pub const DEFAULT_ENGINE_BUFFER: usize = 1024;

/// Configuration for an [`Exchange`](crate::exchange::Exchange)
///
/// # Example
///
/// ```rust
/// use limit_orderbook::Config;
///
/// let config = Config::new();
/// assert_eq!(config.markets(), ["ETH", "BTC"]);
///
/// // Custom markets
/// let config = Config::new()
///     .with_markets(["SOL", "ETH"])
///     .with_engine_buffer(256);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Market symbols to open at startup
    markets: Vec<String>,

    /// Capacity of each engine's command channel
    engine_buffer: usize,
}

impl Config {
    /// Create a configuration with the default markets
    pub fn new() -> Self {
        Self {
            markets: DEFAULT_MARKETS.iter().map(|m| m.to_string()).collect(),
            engine_buffer: DEFAULT_ENGINE_BUFFER,
        }
    }

    /// Replace the market list
    #[must_use]
    pub fn with_markets<I, S>(mut self, markets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.markets = markets.into_iter().map(Into::into).collect();
        self
    }

    /// Add one market to the list
    #[must_use]
    pub fn with_market(mut self, market: impl Into<String>) -> Self {
        self.markets.push(market.into());
        self
    }

    /// Set the engine command channel capacity
    #[must_use]
    pub fn with_engine_buffer(mut self, engine_buffer: usize) -> Self {
        self.engine_buffer = engine_buffer;
        self
    }

    /// Get the configured markets
    pub fn markets(&self) -> &[String] {
        &self.markets
    }

    /// Get the engine command channel capacity
    pub fn engine_buffer(&self) -> usize {
        self.engine_buffer
    }

    /// Check the configuration for empty or duplicate markets and a zero buffer
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<(), Error> {
        if self.engine_buffer == 0 {
            return Err(Error::Config("engine buffer must be at least 1".into()));
        }

        let mut seen = FxHashSet::default();
        for market in &self.markets {
            if market.trim().is_empty() {
                return Err(Error::Config("market symbol cannot be empty".into()));
            }
            if !seen.insert(market.as_str()) {
                return Err(Error::Config(format!("duplicate market: {market}")));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

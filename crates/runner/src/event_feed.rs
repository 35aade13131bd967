//! Quote Feed - random-walk quotes for the simulated venue
//!
//! Stands in for the rest of the market: each tick moves the midpoint by a
//! bounded random step and re-quotes a fixed half-spread around it.

use ballast_core::{Price, Quantity, Symbol};
use exchange_sim::SimVenue;
use exchange_sim::error::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal_macros::dec;

/// Configuration for the quote feed
#[derive(Debug, Clone)]
pub struct QuoteFeedConfig {
    pub symbol: Symbol,
    /// Starting midpoint, in ticks
    pub initial_mid: Price,
    pub half_spread: Price,
    /// Size quoted on each side
    pub depth: Quantity,
    /// Max relative move per tick (e.g. 0.001 = 0.1%)
    pub volatility: f64,
}

impl Default for QuoteFeedConfig {
    fn default() -> Self {
        Self {
            symbol: "IBM".to_string(),
            initial_mid: dec!(100_000),
            half_spread: dec!(50),
            depth: 1_000_000,
            volatility: 0.001,
        }
    }
}

/// Generates successive quotes
pub struct QuoteFeed {
    config: QuoteFeedConfig,
    mid: Price,
    rng: StdRng,
}

impl QuoteFeed {
    /// Create with a specific seed for reproducible simulations
    pub fn with_seed(config: QuoteFeedConfig, seed: u64) -> Self {
        Self {
            mid: config.initial_mid,
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    pub fn mid(&self) -> Price {
        self.mid
    }

    /// Current bid and ask
    pub fn quote(&self) -> (Price, Price) {
        (
            self.mid - self.config.half_spread,
            self.mid + self.config.half_spread,
        )
    }

    /// Move the midpoint one step. It stays whole and above the spread.
    pub fn step(&mut self) -> (Price, Price) {
        let change_pct: f64 = self.rng.gen_range(-1.0..1.0);
        let multiplier = 1.0 + self.config.volatility * change_pct;

        let next = self
            .mid
            .to_f64()
            .and_then(|mid| Decimal::from_f64(mid * multiplier))
            .map(|mid| mid.round())
            .unwrap_or(self.mid);
        self.mid = next.max(self.config.half_spread + Decimal::ONE);
        self.quote()
    }

    /// Step and publish the new quote to the venue
    pub fn tick(&mut self, venue: &mut SimVenue) -> Result<(Price, Price)> {
        let (bid, ask) = self.step();
        venue.set_quote(&self.config.symbol, bid, ask, self.config.depth)?;
        Ok((bid, ask))
    }
}

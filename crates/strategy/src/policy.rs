//! Rebalancing Policy trait
//!
//! A policy turns the current midpoint and portfolio into at most one
//! market order. Policies are stateless; the order-in-flight flag that
//! throttles them belongs to the lifecycle adapter, which consults
//! [`RebalancingPolicy::gate`] to know how to treat it.

use crate::error::Result;
use ballast_core::{OrderRequest, Portfolio, Price, Quantity};
use ballast_ports::MarkToMarket;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// How the adapter's order-in-flight flag restricts a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderGate {
    /// Decide on every cycle, whatever is in flight
    Unrestricted,
    /// At most one order outstanding; execution or cancellation reopens
    SingleInFlight,
    /// One order for the agent's lifetime; only a cancellation reopens
    OneShot,
}

/// Everything a policy may look at when deciding
pub struct DecisionContext<'a> {
    pub symbol: &'a str,
    /// Midpoint of the cached quote, `None` if unavailable
    pub midpoint: Option<Price>,
    pub portfolio: &'a Portfolio,
    pub starting_cash: Decimal,
    pub valuer: &'a dyn MarkToMarket,
}

impl DecisionContext<'_> {
    /// Midpoint usable as a divisor (present and strictly positive)
    pub fn usable_midpoint(&self) -> Option<Price> {
        self.midpoint.filter(|mid| *mid > Decimal::ZERO)
    }

    /// Cash plus marked value of every position
    pub fn total_assets(&self) -> Result<Price> {
        Ok(self.valuer.mark_to_market(self.portfolio)?)
    }

    /// Shares currently held in the traded symbol
    pub fn held(&self) -> Quantity {
        self.portfolio.holding(self.symbol)
    }
}

/// Rebalancing policy - implement this for a portfolio rule
pub trait RebalancingPolicy: Send {
    /// Policy name for logging
    fn name(&self) -> &str;

    /// How the order-in-flight flag gates this policy
    fn gate(&self) -> OrderGate;

    /// Compute the order to submit now, if any
    fn decide(&self, ctx: &DecisionContext<'_>) -> Result<Option<OrderRequest>>;
}

/// Floor a share count to whole shares. `None` if it does not fit.
pub fn floor_shares(value: Decimal) -> Option<Quantity> {
    value.floor().to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_floor_shares() {
        assert_eq!(floor_shares(dec!(2000.999)), Some(2000));
        assert_eq!(floor_shares(dec!(-0.5)), Some(-1));
        assert_eq!(floor_shares(Decimal::MAX), None);
    }
}

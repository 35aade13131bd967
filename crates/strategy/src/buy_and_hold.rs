//! Buy-and-Hold
//!
//! Invests a fixed fraction of starting cash in one market buy at the
//! first usable midpoint, then never trades again. The "never again"
//! part is enforced by the adapter through [`OrderGate::OneShot`].

use crate::{
    error::{Result, StrategyError},
    policy::{DecisionContext, OrderGate, RebalancingPolicy, floor_shares},
};
use ballast_core::OrderRequest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Configuration for buy-and-hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuyAndHoldConfig {
    /// Fraction of starting cash to invest (0..=1)
    pub weight: Decimal,
}

impl Default for BuyAndHoldConfig {
    fn default() -> Self {
        Self { weight: dec!(0.3) }
    }
}

impl BuyAndHoldConfig {
    pub fn validate(&self) -> Result<()> {
        if self.weight < Decimal::ZERO || self.weight > Decimal::ONE {
            return Err(StrategyError::InvalidConfig(format!(
                "buy-and-hold weight must be within [0, 1], got {}",
                self.weight
            )));
        }
        Ok(())
    }
}

/// One-shot buy-and-hold policy
#[derive(Debug, Clone)]
pub struct BuyAndHold {
    config: BuyAndHoldConfig,
}

impl BuyAndHold {
    pub fn new(config: BuyAndHoldConfig) -> Self {
        Self { config }
    }
}

impl RebalancingPolicy for BuyAndHold {
    fn name(&self) -> &str {
        "BuyAndHold"
    }

    fn gate(&self) -> OrderGate {
        OrderGate::OneShot
    }

    fn decide(&self, ctx: &DecisionContext<'_>) -> Result<Option<OrderRequest>> {
        let Some(mid) = ctx.usable_midpoint() else {
            return Ok(None);
        };

        let quantity = floor_shares(ctx.starting_cash * self.config.weight / mid).unwrap_or(0);
        if quantity <= 0 {
            log::debug!("[BuyAndHold] nothing to buy at mid={}", mid);
            return Ok(None);
        }

        Ok(Some(OrderRequest::market_buy(ctx.symbol, quantity)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liquidity::test_support::FlatMark;
    use ballast_core::{Portfolio, Side};

    fn ctx<'a>(
        midpoint: Option<Decimal>,
        portfolio: &'a Portfolio,
        mark: &'a FlatMark,
    ) -> DecisionContext<'a> {
        DecisionContext {
            symbol: "IBM",
            midpoint,
            portfolio,
            starting_cash: dec!(100_000),
            valuer: mark,
        }
    }

    #[test]
    fn test_invests_weight_of_starting_cash() {
        let policy = BuyAndHold::new(BuyAndHoldConfig::default());
        let portfolio = Portfolio::new(dec!(100_000));
        let mark = FlatMark::new("IBM", dec!(997));

        let order = policy
            .decide(&ctx(Some(dec!(997)), &portfolio, &mark))
            .unwrap()
            .unwrap();

        // floor(100_000 * 0.3 / 997) = 30
        assert_eq!(order.quantity, 30);
        assert_eq!(order.side, Side::Buy);
        assert!(order.ignore_risk);
        assert_eq!(policy.gate(), OrderGate::OneShot);
    }

    #[test]
    fn test_no_action_without_valid_midpoint() {
        let policy = BuyAndHold::new(BuyAndHoldConfig::default());
        let portfolio = Portfolio::new(dec!(100_000));
        let mark = FlatMark::new("IBM", dec!(100));

        assert_eq!(policy.decide(&ctx(None, &portfolio, &mark)).unwrap(), None);
        assert_eq!(policy.decide(&ctx(Some(dec!(0)), &portfolio, &mark)).unwrap(), None);
        assert_eq!(policy.decide(&ctx(Some(dec!(-5)), &portfolio, &mark)).unwrap(), None);
    }

    #[test]
    fn test_midpoint_above_budget_buys_nothing() {
        let policy = BuyAndHold::new(BuyAndHoldConfig { weight: dec!(0.1) });
        let portfolio = Portfolio::new(dec!(100_000));
        let mark = FlatMark::new("IBM", dec!(20_000));

        assert_eq!(
            policy.decide(&ctx(Some(dec!(20_000)), &portfolio, &mark)).unwrap(),
            None
        );
    }

    #[test]
    fn test_weight_validation() {
        assert!(BuyAndHoldConfig { weight: dec!(1.5) }.validate().is_err());
        assert!(BuyAndHoldConfig { weight: dec!(0) }.validate().is_ok());
    }
}

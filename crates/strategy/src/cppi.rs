//! Constant-Proportion Portfolio Insurance
//!
//! Keeps the risky position at `multiplier` times the cushion of total
//! assets above a capital floor:
//!
//! ```text
//! TA     = cash + marked shares
//! target = multiplier * (TA - floor)
//! ```
//!
//! Below target it buys the gap, above target it sells the excess, and
//! once the cushion is gone (target < 0) it liquidates.

use crate::{
    error::{Result, StrategyError},
    liquidity::check_liquidity,
    policy::{DecisionContext, OrderGate, RebalancingPolicy, floor_shares},
};
use ballast_core::{OrderRequest, Quantity, Side};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Configuration for CPPI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CppiConfig {
    /// Cushion multiplier (M)
    pub multiplier: Decimal,
    /// Capital floor (F), in cash units
    pub floor: Decimal,
}

impl Default for CppiConfig {
    fn default() -> Self {
        Self {
            multiplier: dec!(1.5),
            floor: dec!(8_000_000),
        }
    }
}

impl CppiConfig {
    pub fn validate(&self) -> Result<()> {
        if self.multiplier <= Decimal::ZERO {
            return Err(StrategyError::InvalidConfig(format!(
                "CPPI multiplier must be positive, got {}",
                self.multiplier
            )));
        }
        if self.floor < Decimal::ZERO {
            return Err(StrategyError::InvalidConfig(format!(
                "CPPI floor must not be negative, got {}",
                self.floor
            )));
        }
        Ok(())
    }
}

/// CPPI policy
#[derive(Debug, Clone)]
pub struct Cppi {
    config: CppiConfig,
}

impl Cppi {
    pub fn new(config: CppiConfig) -> Self {
        Self { config }
    }

    fn buy(&self, ctx: &DecisionContext<'_>, quantity: Quantity) -> Result<Option<OrderRequest>> {
        if !check_liquidity(quantity, Side::Buy, ctx.symbol, ctx.portfolio, ctx.valuer)? {
            log::debug!("[Cppi] buy of {} suppressed by liquidity check", quantity);
            return Ok(None);
        }
        Ok(Some(OrderRequest::market_buy(ctx.symbol, quantity).with_ignore_risk(false)))
    }

    /// Sells are never larger than the position itself
    fn sell(&self, ctx: &DecisionContext<'_>, quantity: Quantity) -> Option<OrderRequest> {
        let quantity = quantity.min(ctx.held());
        (quantity > 0)
            .then(|| OrderRequest::market_sell(ctx.symbol, quantity).with_ignore_risk(false))
    }
}

impl RebalancingPolicy for Cppi {
    fn name(&self) -> &str {
        "Cppi"
    }

    fn gate(&self) -> OrderGate {
        OrderGate::Unrestricted
    }

    fn decide(&self, ctx: &DecisionContext<'_>) -> Result<Option<OrderRequest>> {
        let Some(mid) = ctx.usable_midpoint() else {
            return Ok(None);
        };

        let total_assets = ctx.total_assets()?;
        let share_value = total_assets - ctx.portfolio.cash;
        let target = self.config.multiplier * (total_assets - self.config.floor);

        log::debug!(
            "[Cppi] TA={} share_value={} target={} mid={}",
            total_assets,
            share_value,
            target,
            mid
        );

        if share_value < target && share_value >= Decimal::ZERO && target > Decimal::ZERO {
            let quantity = floor_shares((target - share_value) / mid).unwrap_or(0);
            if ctx.portfolio.cash - Decimal::from(quantity) * mid < Decimal::ZERO {
                return Ok(None);
            }
            return self.buy(ctx, quantity);
        }

        if share_value > target && target > Decimal::ZERO {
            let quantity = floor_shares((share_value - target) / mid).unwrap_or(0);
            return Ok(self.sell(ctx, quantity));
        }

        if share_value > target && target < Decimal::ZERO {
            if share_value > Decimal::ZERO {
                // Cushion exhausted: liquidate
                let quantity = floor_shares(share_value / mid).unwrap_or(0);
                return Ok(self.sell(ctx, quantity));
            }
            if share_value < Decimal::ZERO {
                let quantity = floor_shares(share_value / mid).unwrap_or(0).abs();
                log::warn!(
                    "[Cppi] negative target with negative share value ({}), buying back {}",
                    share_value,
                    quantity
                );
                return self.buy(ctx, quantity);
            }
        }

        Ok(None)
    }
}

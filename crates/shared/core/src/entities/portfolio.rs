//! Cash plus share holdings owned by a single agent

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Execution;
use crate::values::{Quantity, Symbol};

/// An agent's portfolio
///
/// Only confirmed executions mutate a live portfolio. Hypothetical states
/// (for pre-trade checks) are built with [`Portfolio::with_applied`], which
/// returns a disposable copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio {
    pub cash: Decimal,
    pub holdings: BTreeMap<Symbol, Quantity>,
}

impl Portfolio {
    /// Create an all-cash portfolio
    pub fn new(cash: Decimal) -> Self {
        Self {
            cash,
            holdings: BTreeMap::new(),
        }
    }

    /// Builder-style seed of a position
    pub fn with_holding(mut self, symbol: impl Into<Symbol>, quantity: Quantity) -> Self {
        self.holdings.insert(symbol.into(), quantity);
        self
    }

    /// Shares held in `symbol` (zero if never traded)
    pub fn holding(&self, symbol: &str) -> Quantity {
        self.holdings.get(symbol).copied().unwrap_or(0)
    }

    /// Copy of this portfolio with `signed_qty` shares added to `symbol`.
    /// Cash is left untouched.
    pub fn with_applied(&self, symbol: &str, signed_qty: Quantity) -> Self {
        let mut next = self.clone();
        *next.holdings.entry(symbol.to_string()).or_insert(0) += signed_qty;
        next
    }

    /// Apply a confirmed fill: shares move one way, cash the other
    pub fn apply_execution(&mut self, execution: &Execution) {
        let signed = execution.signed_quantity();
        *self.holdings.entry(execution.symbol.clone()).or_insert(0) += signed;
        self.cash -= Decimal::from(signed) * execution.fill_price;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Side;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn fill(side: Side, quantity: Quantity, price: Decimal) -> Execution {
        Execution {
            order_id: Uuid::new_v4(),
            symbol: "IBM".to_string(),
            side,
            quantity,
            fill_price: price,
        }
    }

    #[test]
    fn test_apply_execution_moves_cash_and_shares() {
        let mut portfolio = Portfolio::new(dec!(10_000));

        portfolio.apply_execution(&fill(Side::Buy, 30, dec!(100)));
        assert_eq!(portfolio.holding("IBM"), 30);
        assert_eq!(portfolio.cash, dec!(7_000));

        portfolio.apply_execution(&fill(Side::Sell, 10, dec!(110)));
        assert_eq!(portfolio.holding("IBM"), 20);
        assert_eq!(portfolio.cash, dec!(8_100));
    }

    #[test]
    fn test_with_applied_leaves_original_untouched() {
        let portfolio = Portfolio::new(dec!(500)).with_holding("IBM", 5);
        let hypothetical = portfolio.with_applied("IBM", -7);

        assert_eq!(hypothetical.holding("IBM"), -2);
        assert_eq!(hypothetical.cash, dec!(500));
        assert_eq!(portfolio.holding("IBM"), 5);
    }

    #[test]
    fn test_unknown_symbol_holding_is_zero() {
        let portfolio = Portfolio::new(dec!(1));
        assert_eq!(portfolio.holding("MSFT"), 0);
    }
}

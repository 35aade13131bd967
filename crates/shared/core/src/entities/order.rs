use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Side;
use crate::values::{Quantity, Symbol};

/// Unique identifier for an order, assigned by the venue
pub type OrderId = Uuid;

/// A market order request handed to the exchange
///
/// `quantity` is always positive; direction lives in `side`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: Symbol,
    pub quantity: Quantity,
    pub side: Side,
    /// Skip the agent's exposure limit before submission
    pub ignore_risk: bool,
}

impl OrderRequest {
    /// Market buy. Orders ignore the exposure limit unless told otherwise.
    pub fn market_buy(symbol: impl Into<Symbol>, quantity: Quantity) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            side: Side::Buy,
            ignore_risk: true,
        }
    }

    /// Market sell
    pub fn market_sell(symbol: impl Into<Symbol>, quantity: Quantity) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            side: Side::Sell,
            ignore_risk: true,
        }
    }

    pub fn with_ignore_risk(mut self, ignore_risk: bool) -> Self {
        self.ignore_risk = ignore_risk;
        self
    }

    pub fn is_buy(&self) -> bool {
        self.side == Side::Buy
    }

    /// Quantity with the side folded in (sells are negative)
    pub fn signed_quantity(&self) -> Quantity {
        self.quantity * self.side.sign()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_quantity() {
        let buy = OrderRequest::market_buy("IBM", 25);
        let sell = OrderRequest::market_sell("IBM", 25).with_ignore_risk(false);

        assert!(buy.is_buy());
        assert_eq!(buy.signed_quantity(), 25);
        assert_eq!(sell.signed_quantity(), -25);
        assert!(buy.ignore_risk);
        assert!(!sell.ignore_risk);
    }
}

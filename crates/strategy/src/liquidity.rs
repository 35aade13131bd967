//! Pre-trade checks
//!
//! Both checks run against a disposable hypothetical portfolio; the live
//! portfolio is never touched.

use ballast_core::{OrderRequest, Portfolio, Quantity, Side};
use ballast_ports::{MarkToMarket, PortResult};
use rust_decimal::Decimal;

/// Would trading `quantity` shares keep the agent solvent and long-only?
///
/// Rejects non-positive quantities and anything that would leave the
/// symbol's holding negative. Otherwise the cost is the change in marked
/// value, and the trade passes iff cash covers it.
pub fn check_liquidity(
    quantity: Quantity,
    side: Side,
    symbol: &str,
    portfolio: &Portfolio,
    valuer: &dyn MarkToMarket,
) -> PortResult<bool> {
    if quantity <= 0 {
        return Ok(false);
    }

    let hypothetical = portfolio.with_applied(symbol, quantity * side.sign());

    // Cannot sell what we do not have
    if hypothetical.holding(symbol) < 0 {
        return Ok(false);
    }

    let cost = valuer.mark_to_market(&hypothetical)? - valuer.mark_to_market(portfolio)?;
    Ok(portfolio.cash - cost >= Decimal::ZERO)
}

/// Exposure limit applied to orders that do not ignore risk.
///
/// At-risk capital is marked value minus cash. An order fails only if it
/// raises at-risk capital and the result exceeds the starting cash.
pub fn within_exposure_limit(
    order: &OrderRequest,
    portfolio: &Portfolio,
    starting_cash: Decimal,
    valuer: &dyn MarkToMarket,
) -> PortResult<bool> {
    let hypothetical = portfolio.with_applied(&order.symbol, order.signed_quantity());

    let at_risk = valuer.mark_to_market(portfolio)? - portfolio.cash;
    let new_at_risk = valuer.mark_to_market(&hypothetical)? - hypothetical.cash;

    Ok(!(new_at_risk > at_risk && new_at_risk > starting_cash))
}

#[cfg(test)]
pub(crate) mod test_support {
    use ballast_core::{Portfolio, Price};
    use ballast_ports::{MarkToMarket, PortResult, mark_with_prices};
    use std::collections::HashMap;

    /// Marks every position in a single symbol at a fixed price
    pub struct FlatMark(pub HashMap<String, Price>);

    impl FlatMark {
        pub fn new(symbol: &str, price: Price) -> Self {
            Self(HashMap::from([(symbol.to_string(), price)]))
        }
    }

    impl MarkToMarket for FlatMark {
        fn mark_to_market(&self, portfolio: &Portfolio) -> PortResult<Price> {
            mark_with_prices(portfolio, &self.0)
        }
    }
}

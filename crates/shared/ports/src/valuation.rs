use ballast_core::{Portfolio, Price};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::error::{PortError, PortResult};

/// Port for portfolio valuation at current market prices
pub trait MarkToMarket {
    /// Cash plus every position marked at the host's price for it
    fn mark_to_market(&self, portfolio: &Portfolio) -> PortResult<Price>;
}

impl<T: MarkToMarket + ?Sized> MarkToMarket for &T {
    fn mark_to_market(&self, portfolio: &Portfolio) -> PortResult<Price> {
        (**self).mark_to_market(portfolio)
    }
}

/// Mark a portfolio against a price table.
///
/// Flat positions need no price; a non-zero position without one fails.
pub fn mark_with_prices(
    portfolio: &Portfolio,
    prices: &HashMap<String, Price>,
) -> PortResult<Price> {
    let mut value = portfolio.cash;
    for (symbol, quantity) in &portfolio.holdings {
        if *quantity == 0 {
            continue;
        }
        let price = prices
            .get(symbol)
            .ok_or_else(|| PortError::NoMarkPrice(symbol.clone()))?;
        value += Decimal::from(*quantity) * price;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_mark_with_prices() {
        let portfolio = Portfolio::new(dec!(1_000)).with_holding("IBM", 10);
        let prices = HashMap::from([("IBM".to_string(), dec!(50))]);

        assert_eq!(mark_with_prices(&portfolio, &prices), Ok(dec!(1_500)));
    }

    #[test]
    fn test_flat_position_needs_no_price() {
        let portfolio = Portfolio::new(dec!(1_000)).with_holding("IBM", 0);
        assert_eq!(mark_with_prices(&portfolio, &HashMap::new()), Ok(dec!(1_000)));
    }

    #[test]
    fn test_missing_price_is_an_error() {
        let portfolio = Portfolio::new(dec!(1_000)).with_holding("IBM", 3);
        assert_eq!(
            mark_with_prices(&portfolio, &HashMap::new()),
            Err(PortError::NoMarkPrice("IBM".to_string()))
        );
    }
}

use ballast_core::{OrderRequest, Timestamp};
use chrono::Duration;

use crate::valuation::MarkToMarket;

/// Port for the requests an agent can make of its host
///
/// Every call is fire-and-forget: answers (spread responses, market data,
/// fills, wakeups) come back later as separate callbacks.
pub trait ExchangeHandle {
    /// Ask for the current spread; answered by `QUERY_SPREAD`
    fn query_spread(&mut self, symbol: &str, depth: usize);

    /// Subscribe to periodic book snapshots; answered by `MARKET_DATA`
    fn request_data_subscription(&mut self, symbol: &str, levels: usize, freq: Duration);

    fn place_market_order(&mut self, order: OrderRequest);

    /// Schedule the next wakeup callback
    fn set_wakeup(&mut self, at: Timestamp);

    /// Ask for the trading window; answered by `MARKET_HOURS`
    fn request_market_hours(&mut self);
}

/// Everything an agent needs from its host
pub trait TradingHost: ExchangeHandle + MarkToMarket {}

impl<T: ExchangeHandle + MarkToMarket> TradingHost for T {}

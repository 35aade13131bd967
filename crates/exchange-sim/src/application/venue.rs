use ballast_core::{OrderId, Portfolio};
use ballast_ports::{AgentMessage, HostRequest, MarkToMarket, PortResult, mark_with_prices};
use log::{debug, info, warn};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{ExchangeError, Result};
use crate::infrastructure::VenueSession;
use crate::model::{
    BidAsk, BookLevel, Execution, MarketHours, OrderRequest, Price, Quantity, Side, Symbol,
    Timestamp, VenueBook,
};

/// Quote-driven venue
///
/// Each listed symbol carries a book set by the driver. Market orders fill
/// in full at the touch (best ask for buys, best bid for sells) and the
/// book is left as quoted; the driver moves prices, not the order flow.
#[derive(Debug, Clone)]
pub struct SimVenue {
    books: HashMap<Symbol, VenueBook>,
    hours: MarketHours,
}

impl SimVenue {
    /// Create a venue listing `symbols` with empty books
    pub fn new<S: Into<Symbol>>(symbols: impl IntoIterator<Item = S>, hours: MarketHours) -> Self {
        let books = symbols
            .into_iter()
            .map(|s| (s.into(), VenueBook::default()))
            .collect();
        Self { books, hours }
    }

    pub fn hours(&self) -> MarketHours {
        self.hours
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.books.keys()
    }

    fn book(&self, symbol: &str) -> Result<&VenueBook> {
        self.books
            .get(symbol)
            .ok_or_else(|| ExchangeError::SymbolNotFound(symbol.to_string()))
    }

    fn book_mut(&mut self, symbol: &str) -> Result<&mut VenueBook> {
        self.books
            .get_mut(symbol)
            .ok_or_else(|| ExchangeError::SymbolNotFound(symbol.to_string()))
    }

    /// Replace the quoted levels for `symbol`. Levels are sorted best-first
    /// and empty levels dropped.
    pub fn set_book(
        &mut self,
        symbol: &str,
        mut bids: Vec<BookLevel>,
        mut asks: Vec<BookLevel>,
    ) -> Result<()> {
        bids.retain(|l| l.quantity > 0);
        asks.retain(|l| l.quantity > 0);
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));

        let book = self.book_mut(symbol)?;
        book.bids = bids;
        book.asks = asks;
        Ok(())
    }

    /// Quote a single level on each side
    pub fn set_quote(&mut self, symbol: &str, bid: Price, ask: Price, size: Quantity) -> Result<()> {
        self.set_book(
            symbol,
            vec![BookLevel::new(bid, size)],
            vec![BookLevel::new(ask, size)],
        )
    }

    pub fn best_bid_ask(&self, symbol: &str) -> Result<BidAsk> {
        Ok(self.book(symbol)?.best_bid_ask())
    }

    pub fn last_trade(&self, symbol: &str) -> Result<Option<Price>> {
        Ok(self.book(symbol)?.last_trade)
    }

    /// Last trade if any, else the quoted midpoint
    pub fn mark_price(&self, symbol: &str) -> Result<Option<Price>> {
        Ok(self.book(symbol)?.mark_price())
    }

    /// Mark prices for every symbol that has one
    pub fn mark_prices(&self) -> HashMap<Symbol, Price> {
        self.books
            .iter()
            .filter_map(|(symbol, book)| book.mark_price().map(|p| (symbol.clone(), p)))
            .collect()
    }

    /// Fill a market order at the touch
    pub fn execute(&mut self, order: &OrderRequest) -> Result<Execution> {
        if order.quantity <= 0 {
            return Err(ExchangeError::InvalidOrder(format!(
                "quantity must be positive, got {}",
                order.quantity
            )));
        }

        let book = self.book_mut(&order.symbol)?;
        let touch = match order.side {
            Side::Buy => book.asks.first(),
            Side::Sell => book.bids.first(),
        };
        let fill_price = touch
            .map(|l| l.price)
            .ok_or_else(|| ExchangeError::InsufficientLiquidity(order.symbol.clone()))?;

        book.last_trade = Some(fill_price);

        let execution = Execution {
            order_id: Uuid::new_v4(),
            symbol: order.symbol.clone(),
            side: order.side,
            quantity: order.quantity,
            fill_price,
        };
        debug!(
            "[SimVenue] Filled {:?} {} {} @ {}",
            execution.side, execution.quantity, execution.symbol, execution.fill_price
        );
        Ok(execution)
    }

    /// Answer to a spread query, `depth` levels per side
    pub fn spread_response(
        &self,
        symbol: &str,
        depth: usize,
        now: Timestamp,
    ) -> Result<AgentMessage> {
        let book = self.book(symbol)?;
        Ok(AgentMessage::QuerySpread {
            symbol: symbol.to_string(),
            bids: book.bids.iter().take(depth).copied().collect(),
            asks: book.asks.iter().take(depth).copied().collect(),
            last_trade: book.last_trade,
            mkt_closed: self.hours.is_closed(now),
        })
    }

    /// Snapshot pushed to a data subscriber
    pub fn market_data(&self, symbol: &str, levels: usize) -> Result<AgentMessage> {
        let book = self.book(symbol)?;
        Ok(AgentMessage::MarketData {
            symbol: symbol.to_string(),
            bids: book.bids.iter().take(levels).copied().collect(),
            asks: book.asks.iter().take(levels).copied().collect(),
            last_transaction: book.last_trade,
        })
    }

    /// Answer a request immediately
    ///
    /// Wakeups and subscriptions have no direct reply; they are scheduled
    /// by whoever drives the venue.
    pub fn respond(&mut self, request: &HostRequest, now: Timestamp) -> Vec<AgentMessage> {
        match request {
            HostRequest::QuerySpread { symbol, depth } => {
                match self.spread_response(symbol, *depth, now) {
                    Ok(message) => vec![message],
                    Err(e) => {
                        warn!("[SimVenue] Spread query rejected: {}", e);
                        Vec::new()
                    }
                }
            }
            HostRequest::MarketOrder(order) => self.respond_to_order(order, now),
            HostRequest::MarketHours => vec![AgentMessage::MarketHours {
                open: self.hours.open,
                close: self.hours.close,
            }],
            HostRequest::Subscribe { .. } | HostRequest::Wakeup(_) => Vec::new(),
        }
    }

    fn respond_to_order(&mut self, order: &OrderRequest, now: Timestamp) -> Vec<AgentMessage> {
        if !self.hours.is_open(now) {
            info!("[SimVenue] Order for {} outside market hours", order.symbol);
            return vec![AgentMessage::MarketClosed];
        }

        let order_id: OrderId = Uuid::new_v4();
        match self.execute(order) {
            Ok(mut execution) => {
                execution.order_id = order_id;
                vec![
                    AgentMessage::OrderAccepted {
                        order_id,
                        symbol: order.symbol.clone(),
                    },
                    AgentMessage::OrderExecuted(execution),
                ]
            }
            Err(e) => {
                warn!("[SimVenue] Cancelling order {}: {}", order_id, e);
                vec![AgentMessage::OrderCancelled {
                    order_id,
                    symbol: order.symbol.clone(),
                }]
            }
        }
    }

    /// Open a request-recording session against this venue
    pub fn session(&self) -> VenueSession<'_> {
        VenueSession::new(self)
    }
}

impl MarkToMarket for SimVenue {
    fn mark_to_market(&self, portfolio: &Portfolio) -> PortResult<Price> {
        mark_with_prices(portfolio, &self.mark_prices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballast_ports::{ExchangeHandle, PortError};
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn hours() -> MarketHours {
        let open = Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
        MarketHours::new(open, open + Duration::hours(6) + Duration::minutes(30))
    }

    fn venue() -> SimVenue {
        let mut venue = SimVenue::new(["IBM"], hours());
        venue.set_quote("IBM", dec!(99), dec!(101), 500).unwrap();
        venue
    }

    #[test]
    fn test_set_book_sorts_best_first() {
        let mut venue = SimVenue::new(["IBM"], hours());
        venue
            .set_book(
                "IBM",
                vec![BookLevel::new(dec!(97), 10), BookLevel::new(dec!(98), 20)],
                vec![
                    BookLevel::new(dec!(103), 10),
                    BookLevel::new(dec!(102), 0),
                    BookLevel::new(dec!(101), 5),
                ],
            )
            .unwrap();

        let quote = venue.best_bid_ask("IBM").unwrap();
        assert_eq!(quote.bid, Some(dec!(98)));
        assert_eq!(quote.ask, Some(dec!(101)));
        assert_eq!(quote.ask_volume, Some(5));
    }

    #[test]
    fn test_execute_at_touch() {
        let mut venue = venue();

        let buy = venue.execute(&OrderRequest::market_buy("IBM", 40)).unwrap();
        assert_eq!(buy.fill_price, dec!(101));
        assert_eq!(buy.quantity, 40);

        let sell = venue.execute(&OrderRequest::market_sell("IBM", 10)).unwrap();
        assert_eq!(sell.fill_price, dec!(99));
        assert_eq!(venue.last_trade("IBM").unwrap(), Some(dec!(99)));
    }

    #[test]
    fn test_execute_rejects_bad_orders() {
        let mut venue = venue();
        assert!(matches!(
            venue.execute(&OrderRequest::market_buy("IBM", 0)),
            Err(ExchangeError::InvalidOrder(_))
        ));
        assert_eq!(
            venue.execute(&OrderRequest::market_buy("MSFT", 1)),
            Err(ExchangeError::SymbolNotFound("MSFT".to_string()))
        );

        venue.set_book("IBM", vec![BookLevel::new(dec!(99), 5)], vec![]).unwrap();
        assert_eq!(
            venue.execute(&OrderRequest::market_buy("IBM", 1)),
            Err(ExchangeError::InsufficientLiquidity("IBM".to_string()))
        );
    }

    #[test]
    fn test_mark_prefers_last_trade() {
        let mut venue = venue();
        assert_eq!(venue.mark_price("IBM").unwrap(), Some(dec!(100)));

        venue.execute(&OrderRequest::market_buy("IBM", 1)).unwrap();
        assert_eq!(venue.mark_price("IBM").unwrap(), Some(dec!(101)));

        let portfolio = Portfolio::new(dec!(1_000)).with_holding("IBM", 10);
        assert_eq!(venue.mark_to_market(&portfolio).unwrap(), dec!(1_010));
    }

    #[test]
    fn test_mark_without_prices_fails() {
        let venue = SimVenue::new(["IBM"], hours());
        let portfolio = Portfolio::new(dec!(1_000)).with_holding("IBM", 10);
        assert_eq!(
            venue.mark_to_market(&portfolio),
            Err(PortError::NoMarkPrice("IBM".to_string()))
        );
    }

    #[test]
    fn test_spread_response_flags_close() {
        let venue = venue();
        let after_close = hours().close + Duration::seconds(1);

        match venue.spread_response("IBM", 1, after_close).unwrap() {
            AgentMessage::QuerySpread { bids, mkt_closed, .. } => {
                assert_eq!(bids, vec![BookLevel::new(dec!(99), 500)]);
                assert!(mkt_closed);
            }
            other => panic!("Wrong message: {:?}", other),
        }
    }

    #[test]
    fn test_respond_to_order() {
        let mut venue = venue();
        let now = hours().open + Duration::minutes(1);
        let request = HostRequest::MarketOrder(OrderRequest::market_buy("IBM", 3));

        let replies = venue.respond(&request, now);
        assert_eq!(replies.len(), 2);
        let AgentMessage::OrderAccepted { order_id, .. } = &replies[0] else {
            panic!("Expected acceptance, got {:?}", replies[0]);
        };
        match &replies[1] {
            AgentMessage::OrderExecuted(execution) => assert_eq!(execution.order_id, *order_id),
            other => panic!("Wrong message: {:?}", other),
        }

        let closed = venue.respond(&request, hours().close);
        assert_eq!(closed, vec![AgentMessage::MarketClosed]);
    }

    #[test]
    fn test_order_without_liquidity_is_cancelled() {
        let mut venue = SimVenue::new(["IBM"], hours());
        let now = hours().open;
        let replies = venue.respond(
            &HostRequest::MarketOrder(OrderRequest::market_sell("IBM", 3)),
            now,
        );
        assert!(matches!(replies[..], [AgentMessage::OrderCancelled { .. }]));
    }

    #[test]
    fn test_session_records_and_marks() {
        let venue = venue();
        let mut session = venue.session();
        session.query_spread("IBM", 1);
        session.request_market_hours();

        let portfolio = Portfolio::new(dec!(0)).with_holding("IBM", 2);
        assert_eq!(session.mark_to_market(&portfolio).unwrap(), dec!(200));
        assert_eq!(session.into_requests().len(), 2);
    }
}

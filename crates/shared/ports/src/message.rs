//! Messages crossing the agent/host boundary
//!
//! Inbound bodies are tagged by `msg`, the way the kernel labels them:
//!
//! ```json
//! {"msg": "QUERY_SPREAD", "symbol": "IBM", "bids": [...], "asks": [...], ...}
//! ```

use ballast_core::{BidAsk, Execution, OrderId, OrderRequest, Price, Quantity, Symbol, Timestamp};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::exchange::ExchangeHandle;

/// One price level of a book snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: Price,
    pub quantity: Quantity,
}

impl BookLevel {
    pub fn new(price: Price, quantity: Quantity) -> Self {
        Self { price, quantity }
    }
}

/// Message delivered to an agent by its host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "msg", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentMessage {
    /// Answer to a spread query. Levels are best-first.
    QuerySpread {
        symbol: Symbol,
        bids: Vec<BookLevel>,
        asks: Vec<BookLevel>,
        last_trade: Option<Price>,
        mkt_closed: bool,
    },
    /// Periodic book snapshot for a data subscription
    MarketData {
        symbol: Symbol,
        bids: Vec<BookLevel>,
        asks: Vec<BookLevel>,
        last_transaction: Option<Price>,
    },
    OrderAccepted {
        order_id: OrderId,
        symbol: Symbol,
    },
    OrderExecuted(Execution),
    OrderCancelled {
        order_id: OrderId,
        symbol: Symbol,
    },
    /// Trading window, answer to a market-hours request
    MarketHours {
        open: Timestamp,
        close: Timestamp,
    },
    #[serde(rename = "MKT_CLOSED")]
    MarketClosed,
}

impl AgentMessage {
    /// The `msg` tag this message travels under
    pub fn tag(&self) -> &'static str {
        match self {
            AgentMessage::QuerySpread { .. } => "QUERY_SPREAD",
            AgentMessage::MarketData { .. } => "MARKET_DATA",
            AgentMessage::OrderAccepted { .. } => "ORDER_ACCEPTED",
            AgentMessage::OrderExecuted(_) => "ORDER_EXECUTED",
            AgentMessage::OrderCancelled { .. } => "ORDER_CANCELLED",
            AgentMessage::MarketHours { .. } => "MARKET_HOURS",
            AgentMessage::MarketClosed => "MKT_CLOSED",
        }
    }

    /// Build a spread response from a top-of-book quote
    pub fn spread(symbol: impl Into<Symbol>, quote: BidAsk, mkt_closed: bool) -> Self {
        let level = |price: Option<Price>, quantity: Option<Quantity>| {
            price.map(|p| BookLevel::new(p, quantity.unwrap_or(0)))
        };
        AgentMessage::QuerySpread {
            symbol: symbol.into(),
            bids: level(quote.bid, quote.bid_volume).into_iter().collect(),
            asks: level(quote.ask, quote.ask_volume).into_iter().collect(),
            last_trade: None,
            mkt_closed,
        }
    }
}

/// A request an agent made of its host, in reified form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    QuerySpread {
        symbol: Symbol,
        depth: usize,
    },
    Subscribe {
        symbol: Symbol,
        levels: usize,
        freq: Duration,
    },
    MarketOrder(OrderRequest),
    Wakeup(Timestamp),
    MarketHours,
}

/// A plain request log is the simplest host: it records every call.
impl ExchangeHandle for Vec<HostRequest> {
    fn query_spread(&mut self, symbol: &str, depth: usize) {
        self.push(HostRequest::QuerySpread {
            symbol: symbol.to_string(),
            depth,
        });
    }

    fn request_data_subscription(&mut self, symbol: &str, levels: usize, freq: Duration) {
        self.push(HostRequest::Subscribe {
            symbol: symbol.to_string(),
            levels,
            freq,
        });
    }

    fn place_market_order(&mut self, order: OrderRequest) {
        self.push(HostRequest::MarketOrder(order));
    }

    fn set_wakeup(&mut self, at: Timestamp) {
        self.push(HostRequest::Wakeup(at));
    }

    fn request_market_hours(&mut self) {
        self.push(HostRequest::MarketHours);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballast_core::Side;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_messages_tagged_by_msg() {
        let json = serde_json::to_value(AgentMessage::MarketClosed).unwrap();
        assert_eq!(json["msg"], "MKT_CLOSED");

        let executed = AgentMessage::OrderExecuted(Execution {
            order_id: Uuid::new_v4(),
            symbol: "IBM".to_string(),
            side: Side::Buy,
            quantity: 10,
            fill_price: dec!(100),
        });
        let json = serde_json::to_value(&executed).unwrap();
        assert_eq!(json["msg"], executed.tag());
        assert_eq!(json["quantity"], 10);
    }

    #[test]
    fn test_parse_spread_response() {
        let raw = r#"{
            "msg": "QUERY_SPREAD",
            "symbol": "IBM",
            "bids": [{"price": "9990", "quantity": 100}],
            "asks": [{"price": "10010", "quantity": 50}],
            "last_trade": "10000",
            "mkt_closed": false
        }"#;

        let message: AgentMessage = serde_json::from_str(raw).unwrap();
        match message {
            AgentMessage::QuerySpread { symbol, bids, asks, .. } => {
                assert_eq!(symbol, "IBM");
                assert_eq!(bids[0], BookLevel::new(dec!(9990), 100));
                assert_eq!(asks[0].quantity, 50);
            }
            other => panic!("Wrong message: {:?}", other),
        }
    }

    #[test]
    fn test_spread_from_one_sided_quote() {
        let quote = BidAsk {
            bid: Some(dec!(99)),
            bid_volume: Some(7),
            ..Default::default()
        };
        match AgentMessage::spread("IBM", quote, true) {
            AgentMessage::QuerySpread { bids, asks, mkt_closed, .. } => {
                assert_eq!(bids, vec![BookLevel::new(dec!(99), 7)]);
                assert!(asks.is_empty());
                assert!(mkt_closed);
            }
            other => panic!("Wrong message: {:?}", other),
        }
    }

    #[test]
    fn test_request_log_records_calls() {
        let mut log: Vec<HostRequest> = Vec::new();
        log.query_spread("IBM", 1);
        log.place_market_order(OrderRequest::market_buy("IBM", 3));
        log.request_market_hours();

        assert_eq!(log.len(), 3);
        assert_eq!(
            log[0],
            HostRequest::QuerySpread {
                symbol: "IBM".to_string(),
                depth: 1
            }
        );
        assert!(matches!(log[1], HostRequest::MarketOrder(_)));
    }
}

//! Channel-backed host
//!
//! Forwards every request over an mpsc channel tagged with the agent's
//! identity, and values portfolios against the latest marks published on
//! a watch channel by whoever owns the prices.

use ballast_core::{OrderRequest, Portfolio, Price, Symbol, Timestamp};
use ballast_ports::{ExchangeHandle, HostRequest, MarkToMarket, PortResult, mark_with_prices};
use chrono::Duration;
use std::collections::HashMap;
use tokio::sync::{mpsc, watch};

/// Mark prices by symbol
pub type MarkBoard = HashMap<Symbol, Price>;

/// Request from an agent (includes agent identity)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRequest {
    pub agent_id: String,
    pub request: HostRequest,
}

pub struct ChannelHost {
    agent_id: String,
    request_tx: mpsc::UnboundedSender<AgentRequest>,
    marks: watch::Receiver<MarkBoard>,
}

impl ChannelHost {
    pub fn new(
        agent_id: impl Into<String>,
        request_tx: mpsc::UnboundedSender<AgentRequest>,
        marks: watch::Receiver<MarkBoard>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            request_tx,
            marks,
        }
    }

    fn send(&self, request: HostRequest) {
        let request = AgentRequest {
            agent_id: self.agent_id.clone(),
            request,
        };
        if let Err(e) = self.request_tx.send(request) {
            log::error!("[{}] Failed to send request: {:?}", self.agent_id, e.0.request);
        }
    }
}

impl ExchangeHandle for ChannelHost {
    fn query_spread(&mut self, symbol: &str, depth: usize) {
        self.send(HostRequest::QuerySpread {
            symbol: symbol.to_string(),
            depth,
        });
    }

    fn request_data_subscription(&mut self, symbol: &str, levels: usize, freq: Duration) {
        self.send(HostRequest::Subscribe {
            symbol: symbol.to_string(),
            levels,
            freq,
        });
    }

    fn place_market_order(&mut self, order: OrderRequest) {
        self.send(HostRequest::MarketOrder(order));
    }

    fn set_wakeup(&mut self, at: Timestamp) {
        self.send(HostRequest::Wakeup(at));
    }

    fn request_market_hours(&mut self) {
        self.send(HostRequest::MarketHours);
    }
}

impl MarkToMarket for ChannelHost {
    fn mark_to_market(&self, portfolio: &Portfolio) -> PortResult<Price> {
        mark_with_prices(portfolio, &self.marks.borrow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballast_ports::PortError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_requests_tagged_with_agent() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (_marks_tx, marks_rx) = watch::channel(MarkBoard::new());
        let mut host = ChannelHost::new("wbr-1", tx, marks_rx);

        host.query_spread("IBM", 1);
        host.request_market_hours();

        let first = rx.try_recv().unwrap();
        assert_eq!(first.agent_id, "wbr-1");
        assert_eq!(
            first.request,
            HostRequest::QuerySpread {
                symbol: "IBM".to_string(),
                depth: 1
            }
        );
        assert_eq!(rx.try_recv().unwrap().request, HostRequest::MarketHours);
    }

    #[test]
    fn test_marks_follow_watch_channel() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let (marks_tx, marks_rx) = watch::channel(MarkBoard::new());
        let host = ChannelHost::new("cppi-1", tx, marks_rx);
        let portfolio = Portfolio::new(dec!(500)).with_holding("IBM", 3);

        assert_eq!(
            host.mark_to_market(&portfolio),
            Err(PortError::NoMarkPrice("IBM".to_string()))
        );

        marks_tx.send_replace(MarkBoard::from([("IBM".to_string(), dec!(100))]));
        assert_eq!(host.mark_to_market(&portfolio).unwrap(), dec!(800));
    }

    #[test]
    fn test_send_after_close_is_absorbed() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (_marks_tx, marks_rx) = watch::channel(MarkBoard::new());
        let mut host = ChannelHost::new("bh-1", tx, marks_rx);
        drop(rx);

        host.set_wakeup(chrono::Utc::now());
    }
}

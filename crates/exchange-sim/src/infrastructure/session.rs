use ballast_core::{OrderRequest, Portfolio, Price, Timestamp};
use ballast_ports::{ExchangeHandle, HostRequest, MarkToMarket, PortResult};
use chrono::Duration;

use crate::application::SimVenue;

/// One agent callback's view of the venue
///
/// Requests are recorded rather than answered so the driver can route them
/// with latency; valuation reads the venue directly.
pub struct VenueSession<'a> {
    venue: &'a SimVenue,
    requests: Vec<HostRequest>,
}

impl<'a> VenueSession<'a> {
    pub fn new(venue: &'a SimVenue) -> Self {
        Self {
            venue,
            requests: Vec::new(),
        }
    }

    pub fn requests(&self) -> &[HostRequest] {
        &self.requests
    }

    pub fn into_requests(self) -> Vec<HostRequest> {
        self.requests
    }
}

impl ExchangeHandle for VenueSession<'_> {
    fn query_spread(&mut self, symbol: &str, depth: usize) {
        self.requests.query_spread(symbol, depth);
    }

    fn request_data_subscription(&mut self, symbol: &str, levels: usize, freq: Duration) {
        self.requests.request_data_subscription(symbol, levels, freq);
    }

    fn place_market_order(&mut self, order: OrderRequest) {
        self.requests.place_market_order(order);
    }

    fn set_wakeup(&mut self, at: Timestamp) {
        self.requests.set_wakeup(at);
    }

    fn request_market_hours(&mut self) {
        self.requests.request_market_hours();
    }
}

impl MarkToMarket for VenueSession<'_> {
    fn mark_to_market(&self, portfolio: &Portfolio) -> PortResult<Price> {
        self.venue.mark_to_market(portfolio)
    }
}

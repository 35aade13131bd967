// Re-export domain types from ballast-core
pub use ballast_core::{
    BidAsk, Execution, MarketHours, OrderRequest, Price, Quantity, Side, Symbol, Timestamp,
};
pub use ballast_ports::BookLevel;

/// Quoted book for a single symbol. Levels are stored best-first.
#[derive(Debug, Clone, Default)]
pub struct VenueBook {
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
    pub last_trade: Option<Price>,
}

impl VenueBook {
    pub fn best_bid_ask(&self) -> BidAsk {
        let bid = self.bids.first();
        let ask = self.asks.first();
        BidAsk {
            bid: bid.map(|l| l.price),
            bid_volume: bid.map(|l| l.quantity),
            ask: ask.map(|l| l.price),
            ask_volume: ask.map(|l| l.quantity),
        }
    }

    /// Last trade if any, else the quoted midpoint
    pub fn mark_price(&self) -> Option<Price> {
        self.last_trade.or_else(|| self.best_bid_ask().midpoint())
    }
}

//! Quote Cache
//!
//! Latest known book per symbol, overwritten whenever a spread response or
//! market-data snapshot arrives. No history is retained; policies only
//! ever read the top of book.

use ballast_core::{BidAsk, Price, Quantity, Symbol, Timestamp};
use ballast_ports::BookLevel;
use std::collections::{BTreeMap, HashMap};

/// Cached book for a single symbol
///
/// Uses BTreeMap for price levels to maintain sorted order.
/// Bids are read in descending order (highest first).
/// Asks are read in ascending order (lowest first).
#[derive(Debug, Clone, Default)]
struct CachedBook {
    /// Bid levels: price -> quantity
    bids: BTreeMap<Price, Quantity>,
    /// Ask levels: price -> quantity
    asks: BTreeMap<Price, Quantity>,
    last_trade: Option<Price>,
    updated_at: Option<Timestamp>,
}

impl CachedBook {
    fn best_bid(&self) -> Option<(Price, Quantity)> {
        self.bids.iter().next_back().map(|(p, q)| (*p, *q))
    }

    fn best_ask(&self) -> Option<(Price, Quantity)> {
        self.asks.iter().next().map(|(p, q)| (*p, *q))
    }
}

/// Latest known quotes, keyed by symbol
#[derive(Debug, Clone, Default)]
pub struct QuoteCache {
    books: HashMap<Symbol, CachedBook>,
}

impl QuoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the book for `symbol` with a fresh snapshot
    pub fn apply_snapshot(
        &mut self,
        symbol: &str,
        bids: &[BookLevel],
        asks: &[BookLevel],
        at: Timestamp,
    ) {
        let book = self.books.entry(symbol.to_string()).or_default();
        book.bids.clear();
        book.asks.clear();
        for level in bids.iter().filter(|l| l.quantity > 0) {
            book.bids.insert(level.price, level.quantity);
        }
        for level in asks.iter().filter(|l| l.quantity > 0) {
            book.asks.insert(level.price, level.quantity);
        }
        book.updated_at = Some(at);
    }

    pub fn record_last_trade(&mut self, symbol: &str, price: Price) {
        self.books.entry(symbol.to_string()).or_default().last_trade = Some(price);
    }

    /// Best bid and ask with volumes; all `None` for an unseen symbol
    pub fn best_bid_ask(&self, symbol: &str) -> BidAsk {
        let Some(book) = self.books.get(symbol) else {
            return BidAsk::default();
        };
        let (bid, bid_volume) = book.best_bid().unzip();
        let (ask, ask_volume) = book.best_ask().unzip();
        BidAsk {
            bid,
            bid_volume,
            ask,
            ask_volume,
        }
    }

    /// Mid price of the cached book, if both sides are valid
    pub fn midpoint(&self, symbol: &str) -> Option<Price> {
        self.best_bid_ask(symbol).midpoint()
    }

    pub fn last_trade(&self, symbol: &str) -> Option<Price> {
        self.books.get(symbol)?.last_trade
    }

    pub fn updated_at(&self, symbol: &str) -> Option<Timestamp> {
        self.books.get(symbol)?.updated_at
    }

    /// Get top N bid levels (highest prices first)
    pub fn top_bids(&self, symbol: &str, n: usize) -> Vec<BookLevel> {
        self.books
            .get(symbol)
            .map(|book| {
                book.bids
                    .iter()
                    .rev()
                    .take(n)
                    .map(|(p, q)| BookLevel::new(*p, *q))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get top N ask levels (lowest prices first)
    pub fn top_asks(&self, symbol: &str, n: usize) -> Vec<BookLevel> {
        self.books
            .get(symbol)
            .map(|book| {
                book.asks
                    .iter()
                    .take(n)
                    .map(|(p, q)| BookLevel::new(*p, *q))
                    .collect()
            })
            .unwrap_or_default()
    }
}

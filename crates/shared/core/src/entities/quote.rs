use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::values::{Price, Quantity};

/// Best bid and ask with their volumes, any of which may be unknown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidAsk {
    pub bid: Option<Price>,
    pub bid_volume: Option<Quantity>,
    pub ask: Option<Price>,
    pub ask_volume: Option<Quantity>,
}

impl BidAsk {
    pub fn new(bid: Price, bid_volume: Quantity, ask: Price, ask_volume: Quantity) -> Self {
        Self {
            bid: Some(bid),
            bid_volume: Some(bid_volume),
            ask: Some(ask),
            ask_volume: Some(ask_volume),
        }
    }

    /// Average of best bid and best ask, rounded half-to-even to a whole tick.
    ///
    /// `None` when either side is missing or not strictly positive.
    pub fn midpoint(&self) -> Option<Price> {
        let (bid, ask) = (self.bid?, self.ask?);
        if bid <= Decimal::ZERO || ask <= Decimal::ZERO {
            return None;
        }
        let mid = (bid + ask) / Decimal::TWO;
        Some(mid.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
    }

    /// Get spread (ask - bid)
    pub fn spread(&self) -> Option<Price> {
        Some(self.ask? - self.bid?)
    }

    pub fn is_two_sided(&self) -> bool {
        self.bid.is_some() && self.ask.is_some()
    }
}

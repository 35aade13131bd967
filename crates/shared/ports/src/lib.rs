//! Ballast Ports
//!
//! Port definitions for the ballast agents. The simulation kernel, the
//! exchange and the order book are external; these traits and message
//! types are the whole of what an agent sees of them.

mod error;
mod exchange;
mod message;
mod valuation;

pub use error::{PortError, PortResult};
pub use exchange::{ExchangeHandle, TradingHost};
pub use message::{AgentMessage, BookLevel, HostRequest};
pub use valuation::{MarkToMarket, mark_with_prices};

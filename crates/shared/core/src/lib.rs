//! Ballast Core Domain
//!
//! Pure domain types for the ballast rebalancing agents.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{BidAsk, Execution, MarketHours, OrderId, OrderRequest, Portfolio, Side};
pub use values::{Price, Quantity, Symbol, Timestamp};

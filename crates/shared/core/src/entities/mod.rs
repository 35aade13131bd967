mod execution;
mod market_hours;
mod order;
mod portfolio;
mod quote;
mod side;

pub use execution::Execution;
pub use market_hours::MarketHours;
pub use order::{OrderId, OrderRequest};
pub use portfolio::Portfolio;
pub use quote::BidAsk;
pub use side::Side;

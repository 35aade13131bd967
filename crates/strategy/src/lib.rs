//! Ballast Strategy
//!
//! Portfolio rebalancing rules for agents living inside an external
//! market simulation:
//! - Quote cache holding the latest known book per symbol
//! - Liquidity check and exposure limit for pre-trade validation
//! - `RebalancingPolicy` trait with three implementations:
//!   buy-and-hold, CPPI and weight-band rebalancing (WBR)
//!
//! ## Decision flow
//!
//! ```text
//! QUERY_SPREAD / MARKET_DATA ──► QuoteCache ──► midpoint
//!                                                  │
//!                    Portfolio + MarkToMarket ─────┤
//!                                                  ▼
//!                                        ┌───────────────────┐
//!                                        │ RebalancingPolicy │
//!                                        └─────────┬─────────┘
//!                                                  │ Option<OrderRequest>
//!                                                  ▼
//!                                   Lifecycle adapter (ballast-runner)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ballast_strategy::{PolicyConfig, WbrConfig};
//!
//! let policy = PolicyConfig::Wbr(WbrConfig { weight: dec!(0.2), band: dec!(0.05) }).build()?;
//! let order = policy.decide(&ctx)?;
//! ```

pub mod buy_and_hold;
pub mod config;
pub mod cppi;
pub mod error;
pub mod liquidity;
pub mod policy;
pub mod quote_cache;
pub mod wbr;

// Re-export main types
pub use buy_and_hold::{BuyAndHold, BuyAndHoldConfig};
pub use config::PolicyConfig;
pub use cppi::{Cppi, CppiConfig};
pub use error::{Result, StrategyError};
pub use liquidity::{check_liquidity, within_exposure_limit};
pub use policy::{DecisionContext, OrderGate, RebalancingPolicy};
pub use quote_cache::QuoteCache;
pub use wbr::{Wbr, WbrConfig};

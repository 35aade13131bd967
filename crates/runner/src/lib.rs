//! Ballast Runner - hosting rebalancing agents
//!
//! Everything between a `RebalancingPolicy` and the kernel it lives in:
//!
//! - **Lifecycle**: the per-agent state machine driven by wakeups and messages
//! - **Config**: JSON agent definitions, loading and validation
//! - **Agent Runner**: async, channel-fed driver for one agent
//! - **Simulation**: deterministic market day against the simulated venue
//!
//! ## Architecture
//!
//! ```text
//!             ┌──────────────────────────────┐
//!             │   Kernel (external)          │
//!             │   or Simulation (test double)│
//!             └───────┬──────────────▲───────┘
//!      wakeup/message │              │ HostRequest
//!                     ▼              │
//!             ┌──────────────────────┴───────┐
//!             │        TradingAgent          │
//!             │  AgentState + order in flight│
//!             │  QuoteCache + Portfolio      │
//!             └───────────────┬──────────────┘
//!                             │ DecisionContext
//!                             ▼
//!             ┌──────────────────────────────┐
//!             │  RebalancingPolicy           │
//!             │  (buy-and-hold, CPPI, WBR)   │
//!             └──────────────────────────────┘
//! ```

pub mod agent;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod event_feed;
pub mod host;
pub mod lifecycle;
pub mod schedule;
pub mod simulation;
pub mod state;

// Re-export main types
pub use agent::{AgentRunner, KernelEvent};
pub use bootstrap::{SimulationBootstrap, build_agents};
pub use config::{AgentConfig, AgentsFile, ConfigError, QuoteMode};
pub use error::{Result, RunnerError};
pub use event_feed::{QuoteFeed, QuoteFeedConfig};
pub use host::{AgentRequest, ChannelHost, MarkBoard};
pub use lifecycle::{FinalValuation, TradingAgent};
pub use schedule::{WakeConfig, WakeSchedule};
pub use simulation::{Simulation, SimulationConfig, SimulationResults};
pub use state::AgentState;

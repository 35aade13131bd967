use std::fmt;

/// Where an agent is in its wakeup / query cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentState {
    /// Idle until the next scheduled wakeup
    AwaitingWakeup,
    /// Spread query outstanding
    AwaitingSpread,
    /// Subscribed; every market-data update drives the policy
    AwaitingMarketData,
    /// Outside the trading window or waiting on market hours
    Inactive,
    /// One-shot policy completed; nothing left to do
    Active,
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AgentState::AwaitingWakeup => "AWAITING_WAKEUP",
            AgentState::AwaitingSpread => "AWAITING_SPREAD",
            AgentState::AwaitingMarketData => "AWAITING_MARKET_DATA",
            AgentState::Inactive => "INACTIVE",
            AgentState::Active => "ACTIVE",
        };
        f.write_str(label)
    }
}

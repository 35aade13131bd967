use ballast_core::{Symbol, Timestamp};
use ballast_strategy::{BuyAndHoldConfig, CppiConfig, PolicyConfig, WbrConfig};
use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::schedule::WakeConfig;

/// Root configuration: the agents to load into a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentsFile {
    pub agents: Vec<AgentConfig>,
}

/// How an agent learns the current quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuoteMode {
    /// Query the spread on every wakeup
    #[default]
    Poll,
    /// Subscribe once and react to every snapshot
    Stream {
        #[serde(default = "default_levels")]
        levels: usize,
        #[serde(default = "default_stream_freq_ns")]
        freq_ns: i64,
    },
}

impl QuoteMode {
    /// One level every ten seconds
    pub fn stream() -> Self {
        QuoteMode::Stream {
            levels: default_levels(),
            freq_ns: default_stream_freq_ns(),
        }
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, QuoteMode::Stream { .. })
    }

    pub fn stream_freq(&self) -> Option<Duration> {
        match self {
            QuoteMode::Poll => None,
            QuoteMode::Stream { freq_ns, .. } => Some(Duration::nanoseconds(*freq_ns)),
        }
    }
}

/// Configuration for a single agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Unique identifier, used as the log prefix
    pub agent_id: String,
    /// Symbol traded
    pub symbol: Symbol,
    /// Cash at kernel start, in ticks
    pub starting_cash: Decimal,
    #[serde(default)]
    pub quote_mode: QuoteMode,
    pub wake: WakeConfig,
    /// Earliest time the agent starts trading
    #[serde(default)]
    pub start_at: Option<Timestamp>,
    /// Log every placed order at info
    #[serde(default)]
    pub log_orders: bool,
    /// Seed for the agent's wake schedule
    #[serde(default)]
    pub seed: u64,
    pub policy: PolicyConfig,
}

impl AgentConfig {
    /// Buy-and-hold with a random wake offset of up to 100ns
    pub fn buy_and_hold(agent_id: &str, symbol: &str, starting_cash: Decimal) -> Self {
        Self::with_policy(
            agent_id,
            symbol,
            starting_cash,
            WakeConfig::Random {
                min_ns: 0,
                max_ns: 100,
            },
            PolicyConfig::BuyAndHold(BuyAndHoldConfig::default()),
        )
    }

    /// CPPI waking every 60 seconds
    pub fn cppi(agent_id: &str, symbol: &str, starting_cash: Decimal) -> Self {
        Self::with_policy(
            agent_id,
            symbol,
            starting_cash,
            WakeConfig::every_seconds(60),
            PolicyConfig::Cppi(CppiConfig::default()),
        )
    }

    /// Weight-band rebalancing waking every 40 seconds
    pub fn wbr(agent_id: &str, symbol: &str, starting_cash: Decimal) -> Self {
        Self::with_policy(
            agent_id,
            symbol,
            starting_cash,
            WakeConfig::every_seconds(40),
            PolicyConfig::Wbr(WbrConfig::default()),
        )
    }

    fn with_policy(
        agent_id: &str,
        symbol: &str,
        starting_cash: Decimal,
        wake: WakeConfig,
        policy: PolicyConfig,
    ) -> Self {
        Self {
            agent_id: agent_id.to_string(),
            symbol: symbol.to_string(),
            starting_cash,
            quote_mode: QuoteMode::Poll,
            wake,
            start_at: None,
            log_orders: false,
            seed: 0,
            policy,
        }
    }

    pub fn with_quote_mode(mut self, quote_mode: QuoteMode) -> Self {
        self.quote_mode = quote_mode;
        self
    }

    pub fn with_policy_config(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_start_at(mut self, start_at: Timestamp) -> Self {
        self.start_at = Some(start_at);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

fn default_levels() -> usize {
    1
}

fn default_stream_freq_ns() -> i64 {
    10_000_000_000
}

use ballast_strategy::StrategyError;
use exchange_sim::error::ExchangeError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Venue error: {0}")]
    Exchange(#[from] ExchangeError),

    #[error("Agent {agent_id} trades {symbol}, which the venue does not list")]
    UnlistedSymbol { agent_id: String, symbol: String },
}

pub type Result<T> = std::result::Result<T, RunnerError>;

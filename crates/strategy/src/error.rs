//! Strategy errors

use ballast_ports::PortError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrategyError {
    #[error("Valuation failed: {0}")]
    Valuation(#[from] PortError),

    #[error("Invalid policy config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, StrategyError>;

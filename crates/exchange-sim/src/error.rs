use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Insufficient liquidity for {0}")]
    InsufficientLiquidity(String),
}

pub type Result<T> = std::result::Result<T, ExchangeError>;

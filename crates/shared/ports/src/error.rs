use thiserror::Error;

/// Failures reported by the host through a port
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("No mark price available for {0}")]
    NoMarkPrice(String),
}

pub type PortResult<T> = std::result::Result<T, PortError>;

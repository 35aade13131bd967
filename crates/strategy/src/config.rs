//! Serializable policy selection

use crate::{
    buy_and_hold::{BuyAndHold, BuyAndHoldConfig},
    cppi::{Cppi, CppiConfig},
    error::Result,
    policy::RebalancingPolicy,
    wbr::{Wbr, WbrConfig},
};
use serde::{Deserialize, Serialize};

/// Which rebalancing rule an agent runs, with its parameters
///
/// ```json
/// {"kind": "wbr", "weight": "0.2", "band": "0.05"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyConfig {
    BuyAndHold(BuyAndHoldConfig),
    Cppi(CppiConfig),
    Wbr(WbrConfig),
}

impl PolicyConfig {
    pub fn validate(&self) -> Result<()> {
        match self {
            PolicyConfig::BuyAndHold(config) => config.validate(),
            PolicyConfig::Cppi(config) => config.validate(),
            PolicyConfig::Wbr(config) => config.validate(),
        }
    }

    /// Validate and instantiate the policy
    pub fn build(&self) -> Result<Box<dyn RebalancingPolicy>> {
        self.validate()?;
        Ok(match self {
            PolicyConfig::BuyAndHold(config) => Box::new(BuyAndHold::new(config.clone())),
            PolicyConfig::Cppi(config) => Box::new(Cppi::new(config.clone())),
            PolicyConfig::Wbr(config) => Box::new(Wbr::new(config.clone())),
        })
    }
}

//! Bootstrap - simulation setup from an agents file
//!
//! Validates the configuration, builds one `TradingAgent` per entry and
//! hands them to a `Simulation` over the venue they trade on.

use log::info;

use crate::config::AgentsFile;
use crate::error::Result;
use crate::lifecycle::TradingAgent;
use crate::simulation::{Simulation, SimulationConfig};

/// Validated agents plus the market they will run in
pub struct SimulationBootstrap {
    pub agents: Vec<TradingAgent>,
    pub config: SimulationConfig,
}

impl SimulationBootstrap {
    pub fn from_file(file: &AgentsFile, config: SimulationConfig) -> Result<Self> {
        Ok(Self {
            agents: build_agents(file)?,
            config,
        })
    }

    pub fn into_simulation(self) -> Result<Simulation> {
        Simulation::new(self.config, self.agents)
    }
}

/// Validate the file and instantiate every agent in it
pub fn build_agents(file: &AgentsFile) -> Result<Vec<TradingAgent>> {
    file.validate()?;
    let agents = file
        .agents
        .iter()
        .map(TradingAgent::from_config)
        .collect::<Result<Vec<_>>>()?;

    for agent in &agents {
        info!("[Bootstrap] Agent {} trading {}", agent.id(), agent.symbol());
    }
    Ok(agents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AgentConfig, load_default_config};
    use crate::error::RunnerError;
    use crate::state::AgentState;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bootstrap_default_agents() {
        let file = load_default_config().unwrap();
        let bootstrap = SimulationBootstrap::from_file(&file, SimulationConfig::default()).unwrap();

        assert_eq!(bootstrap.agents.len(), 3);
        assert!(
            bootstrap
                .agents
                .iter()
                .all(|a| a.state() == AgentState::AwaitingWakeup && a.symbol() == "IBM")
        );
        assert!(bootstrap.into_simulation().is_ok());
    }

    #[test]
    fn test_invalid_file_rejected() {
        let file = AgentsFile {
            agents: vec![AgentConfig::cppi("cppi-1", "IBM", dec!(-5))],
        };
        assert!(matches!(build_agents(&file), Err(RunnerError::Config(_))));
    }
}

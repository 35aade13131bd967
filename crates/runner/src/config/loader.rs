use rust_decimal::Decimal;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use super::types::{AgentConfig, AgentsFile, QuoteMode};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("No agents in config")]
    NoAgents,
    #[error("Duplicate agent id: {0}")]
    DuplicateAgent(String),
    #[error("Invalid agent {agent_id}: {reason}")]
    InvalidAgent { agent_id: String, reason: String },
}

/// Load agent configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AgentsFile, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: AgentsFile = serde_json::from_str(&content)?;
    Ok(config)
}

/// Load configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<AgentsFile, ConfigError> {
    let config: AgentsFile = serde_json::from_str(json)?;
    Ok(config)
}

/// Load the default embedded configuration
pub fn load_default_config() -> Result<AgentsFile, ConfigError> {
    let default_config = include_str!("default_agents.json");
    load_config_from_str(default_config)
}

impl AgentsFile {
    /// Get a specific agent by ID
    pub fn get_agent(&self, agent_id: &str) -> Option<&AgentConfig> {
        self.agents.iter().find(|a| a.agent_id == agent_id)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agents.is_empty() {
            return Err(ConfigError::NoAgents);
        }

        let mut seen = HashSet::new();
        for agent in &self.agents {
            if !seen.insert(agent.agent_id.as_str()) {
                return Err(ConfigError::DuplicateAgent(agent.agent_id.clone()));
            }
            agent.validate()?;
        }
        Ok(())
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidAgent {
            agent_id: self.agent_id.clone(),
            reason,
        };

        if self.symbol.is_empty() {
            return Err(invalid("symbol is empty".to_string()));
        }
        if self.starting_cash <= Decimal::ZERO {
            return Err(invalid(format!(
                "starting cash must be positive, got {}",
                self.starting_cash
            )));
        }
        if let QuoteMode::Stream { levels, freq_ns } = self.quote_mode {
            if levels == 0 || freq_ns <= 0 {
                return Err(invalid(format!(
                    "stream needs levels > 0 and freq > 0, got {} levels every {}ns",
                    levels, freq_ns
                )));
            }
        }
        self.wake.validate().map_err(invalid)?;
        self.policy
            .validate()
            .map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }
}

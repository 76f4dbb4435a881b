//! Configuration of an experiment.
use anyhow::Result;
use pursuit_candle_agent::{
    cnn::{Cnn, CnnConfig},
    dqn::{DqnConfig, DqnModelConfig},
};
use pursuit_core::{error::PursuitError, SimpleReplayBufferConfig, TrainerConfig};
use pursuit_env::PursuitEnvConfig;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configurations of all components of an experiment.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ExperimentConfig {
    /// Seed of the environment.
    #[serde(default)]
    pub seed: i64,

    /// Configuration of the environment.
    pub env_config: PursuitEnvConfig,

    /// Configuration of the replay buffer.
    pub replay_buffer_config: SimpleReplayBufferConfig,

    /// Configuration of the agent.
    pub agent_config: DqnConfig<Cnn>,

    /// Configuration of the training loop.
    pub trainer_config: TrainerConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            env_config: PursuitEnvConfig::default(),
            replay_buffer_config: SimpleReplayBufferConfig::default(),
            agent_config: DqnConfig::default(),
            trainer_config: TrainerConfig::default(),
        }
        .fit_model_to_env()
    }
}

impl ExperimentConfig {
    /// Sets the environment configuration and resizes the model to it.
    pub fn env_config(mut self, v: PursuitEnvConfig) -> Self {
        self.env_config = v;
        self.fit_model_to_env()
    }

    /// Sets the seed of the environment, the replay buffer and the agent.
    pub fn seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self.replay_buffer_config = self.replay_buffer_config.seed(seed as u64);
        self.agent_config = self.agent_config.seed(seed as u64);
        self
    }

    /// Sets the input shape and the output dimension of the action-value
    /// function to the observation shape and the number of actions of the
    /// environment.
    pub fn fit_model_to_env(mut self) -> Self {
        let q_config = CnnConfig::new(
            self.env_config.obs_shape(),
            self.env_config.n_actions() as i64,
        );
        let model_config: DqnModelConfig<CnnConfig> =
            self.agent_config.get_model_config().clone().q_config(q_config);
        self.agent_config = self.agent_config.model_config(model_config);
        self
    }

    /// Checks the configurations of all components.
    pub fn validate(&self) -> Result<()> {
        self.env_config.validate()?;
        self.replay_buffer_config.validate()?;
        self.trainer_config.validate()?;
        if self.replay_buffer_config.capacity < self.trainer_config.min_replay_size {
            return Err(PursuitError::InvalidConfig(format!(
                "replay buffer capacity {} is smaller than min_replay_size {}",
                self.replay_buffer_config.capacity, self.trainer_config.min_replay_size
            ))
            .into());
        }
        Ok(())
    }

    /// Constructs [`ExperimentConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ExperimentConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_follows_env() -> Result<()> {
        let config = ExperimentConfig::default()
            .env_config(PursuitEnvConfig::default().tile_size(8).grid_size(5, 6));
        let model_config = config.agent_config.get_model_config().clone();
        let expected = DqnModelConfig::default().q_config(CnnConfig::new([40, 48, 3], 4));
        assert_eq!(model_config, expected);
        Ok(())
    }

    #[test]
    fn test_validate_capacity() {
        let mut config = ExperimentConfig::default();
        assert!(config.validate().is_ok());
        config.replay_buffer_config = config.replay_buffer_config.capacity(10);
        assert!(config.validate().is_err());
    }
}

//! Configuration of [`Trainer`](super::Trainer).
use crate::error::PursuitError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The number of training episodes.
    pub num_episodes: usize,

    /// The number of transitions in a batch for an optimization step.
    pub batch_size: usize,

    /// Optimization starts once the replay buffer holds this many transitions.
    pub min_replay_size: usize,

    /// Interval of synchronizing the target model in completed episodes.
    pub target_sync_interval: usize,

    /// Interval of saving model parameters in completed episodes. `0` disables saving.
    pub save_interval: usize,

    /// Episodes are cut after this many steps, if given.
    #[serde(default)]
    pub max_episode_steps: Option<usize>,

    /// Where to save the trained model.
    #[serde(default)]
    pub model_dir: Option<String>,

    /// Interval of writing episode records in completed episodes.
    #[serde(default = "default_log_interval")]
    pub log_interval: usize,
}

fn default_log_interval() -> usize {
    1
}

fn invalid(msg: &str) -> Result<()> {
    Err(PursuitError::InvalidConfig(msg.to_string()).into())
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            num_episodes: 1000,
            batch_size: 32,
            min_replay_size: 1000,
            target_sync_interval: 10,
            save_interval: 50,
            max_episode_steps: None,
            model_dir: None,
            log_interval: default_log_interval(),
        }
    }
}

impl TrainerConfig {
    /// Sets the number of training episodes.
    pub fn num_episodes(mut self, v: usize) -> Self {
        self.num_episodes = v;
        self
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the minimum number of stored transitions before optimization.
    pub fn min_replay_size(mut self, v: usize) -> Self {
        self.min_replay_size = v;
        self
    }

    /// Sets the interval of target synchronization in episodes.
    pub fn target_sync_interval(mut self, v: usize) -> Self {
        self.target_sync_interval = v;
        self
    }

    /// Sets the interval of saving in episodes.
    pub fn save_interval(mut self, v: usize) -> Self {
        self.save_interval = v;
        self
    }

    /// Sets the maximum number of steps in an episode.
    pub fn max_episode_steps(mut self, v: Option<usize>) -> Self {
        self.max_episode_steps = v;
        self
    }

    /// Sets the directory where trained models are saved.
    pub fn model_dir(mut self, model_dir: impl Into<String>) -> Self {
        self.model_dir = Some(model_dir.into());
        self
    }

    /// Sets the interval of writing records in episodes.
    pub fn log_interval(mut self, v: usize) -> Self {
        self.log_interval = v;
        self
    }

    /// Checks the configuration.
    ///
    /// `min_replay_size` must not be smaller than `batch_size`, so that sampling
    /// a batch never fails during training.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return invalid("batch_size must be positive");
        }
        if self.min_replay_size < self.batch_size {
            return invalid("min_replay_size must be at least batch_size");
        }
        if self.target_sync_interval == 0 {
            return invalid("target_sync_interval must be positive");
        }
        if self.log_interval == 0 {
            return invalid("log_interval must be positive");
        }
        if self.max_episode_steps == Some(0) {
            return invalid("max_episode_steps must be positive");
        }
        Ok(())
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_trainer_config() -> Result<()> {
        let config = TrainerConfig::default()
            .num_episodes(100)
            .max_episode_steps(Some(500))
            .model_dir("some/directory");

        let dir = TempDir::new("trainer_config")?;
        let path = dir.path().join("trainer_config.yaml");
        config.save(&path)?;
        let config_ = TrainerConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(TrainerConfig::default().validate().is_ok());

        let config = TrainerConfig::default().batch_size(64).min_replay_size(32);
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PursuitError>(),
            Some(PursuitError::InvalidConfig(_))
        ));

        assert!(TrainerConfig::default()
            .target_sync_interval(0)
            .validate()
            .is_err());
    }
}

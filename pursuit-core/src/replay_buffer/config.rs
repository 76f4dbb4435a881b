//! Configuration of [SimpleReplayBuffer](super::SimpleReplayBuffer).
use crate::error::PursuitError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Configuration of [SimpleReplayBuffer](super::SimpleReplayBuffer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SimpleReplayBufferConfig {
    /// The maximum number of transitions.
    pub capacity: usize,

    /// Random seed for sampling batches.
    pub seed: u64,
}

impl Default for SimpleReplayBufferConfig {
    fn default() -> Self {
        Self {
            capacity: 50_000,
            seed: 42,
        }
    }
}

impl SimpleReplayBufferConfig {
    /// Sets the capacity of the replay buffer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the random seed for sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(PursuitError::InvalidConfig("capacity must be positive".into()).into());
        }
        Ok(())
    }
}

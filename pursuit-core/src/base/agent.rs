//! Agent.
use super::{Env, Policy, ReplayBufferBase};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// Represents a trainable policy on an environment.
pub trait Agent<E: Env, R: ReplayBufferBase>: Policy<E> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Performs an optimization step with a batch sampled from a replay buffer
    /// and returns some information, e.g., the loss.
    fn opt(&mut self, batch: R::Batch) -> Result<Record>;

    /// Copies the parameters of the trained model to its target model.
    fn sync_target(&mut self) -> Result<()>;

    /// Called by the trainer after every completed episode.
    ///
    /// Per-episode schedules, like exploration decay, advance here.
    fn end_episode(&mut self) -> Record;

    /// Checks that the agent accepts observations of `obs_shape` and
    /// outputs `n_actions` action values.
    fn check_spaces(&self, obs_shape: &[usize], n_actions: usize) -> Result<()>;

    /// Save the parameters of the agent in the given directory.
    /// This method commonly creates a number of files consisting the agent
    /// in the directory. For example, the DQN agent in `pursuit_candle_agent` crate saves
    /// two Q-networks corresponding to the online and target networks.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Load the parameters of the agent from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}

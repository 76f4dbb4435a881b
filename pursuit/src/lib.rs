//! Trains a DQN agent to play the grid pursuit-evasion game.
//!
//! The crate ties together the environment of `pursuit-env`, the agent of
//! `pursuit-candle-agent` and the training loop of `pursuit-core`:
//!
//! * [`ExperimentConfig`] bundles the configurations of all components and is
//!   stored as a single YAML file.
//! * [`train`] runs the episodic training loop and saves checkpoints.
//! * [`evaluate`] runs greedy episodes with a saved checkpoint.
//!
//! The `pursuit` binary exposes these through a command line interface.
mod config;
mod experiment;
pub use config::ExperimentConfig;
pub use experiment::{
    build_agent, evaluate, load_trained_config, train, CONFIG_FILE, FINAL_CHECKPOINT,
};

use pursuit_candle_agent::{cnn::Cnn, dqn::Dqn};
use pursuit_core::SimpleReplayBuffer;
use pursuit_env::{PursuitAct, PursuitEnv, PursuitObs};

/// Replay buffer of the game.
pub type ReplayBuffer = SimpleReplayBuffer<PursuitObs, PursuitAct>;

/// DQN agent of the game.
pub type DqnAgent = Dqn<PursuitEnv, Cnn, ReplayBuffer>;

#![warn(missing_docs)]
//! Core components for training value-based agents on episodic environments.
//!
//! The crate defines the interfaces shared by the environment and the agent
//! crates, together with the generic machinery driving them:
//!
//! * [`Env`], [`Obs`], [`Act`] and [`Step`] describe an episodic environment.
//! * [`Policy`] and [`Agent`] describe a (trainable) mapping from observations to actions.
//! * [`SimpleReplayBuffer`] stores [`Transition`]s and samples [`TransitionBatch`]es.
//! * [`Trainer`] runs the episodic training loop, [`DefaultEvaluator`] runs greedy evaluation.
//! * [`record`] carries metrics out of the training loop.
pub mod dummy;
pub mod error;
pub mod record;
pub mod replay_buffer;

mod base;
pub use base::{
    Act, Agent, DiscreteAct, Env, ExperienceBufferBase, Info, Obs, PixelObs, Policy,
    ReplayBufferBase, Step,
};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

mod trainer;
pub use replay_buffer::{SimpleReplayBuffer, SimpleReplayBufferConfig, Transition, TransitionBatch};
pub use trainer::{Trainer, TrainerConfig};

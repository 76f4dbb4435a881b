//! A simple replay buffer of transitions.
//!
//! [`SimpleReplayBuffer`] keeps the latest `capacity` [`Transition`]s in insertion
//! order, evicting the oldest one first, and samples [`TransitionBatch`]es
//! uniformly at random without replacement.
mod base;
mod batch;
mod config;
pub use base::SimpleReplayBuffer;
pub use batch::{Transition, TransitionBatch};
pub use config::SimpleReplayBufferConfig;

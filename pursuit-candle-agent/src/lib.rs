//! DQN agent implemented with [candle](https://crates.io/crates/candle-core).
//!
//! The action-value function is a [`Cnn`](cnn::Cnn) on raw RGB frames. [`Dqn`](dqn::Dqn)
//! implements [`Agent`](pursuit_core::Agent) for any environment whose observations are
//! [`PixelObs`](pursuit_core::PixelObs) and whose actions are
//! [`DiscreteAct`](pursuit_core::DiscreteAct).
pub mod cnn;
pub mod dqn;
pub mod model;
pub mod opt;
pub mod util;
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq)]
/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    Cpu,

    /// The main GPU device.
    Cuda(usize),
}

impl Default for Device {
    fn default() -> Self {
        Self::Cpu
    }
}

impl Device {
    /// Returns the corresponding [`candle_core::Device`].
    ///
    /// Fails if the CUDA device is not available.
    pub fn to_candle(self) -> Result<candle_core::Device> {
        match self {
            Self::Cpu => Ok(candle_core::Device::Cpu),
            Self::Cuda(n) => Ok(candle_core::Device::new_cuda(n)?),
        }
    }
}

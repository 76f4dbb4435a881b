//! Core functionalities.
mod agent;
mod env;
mod policy;
mod replay_buffer;
mod step;
pub use agent::Agent;
pub use env::Env;
pub use policy::Policy;
pub use replay_buffer::{ExperienceBufferBase, ReplayBufferBase};
use std::fmt::Debug;
pub use step::{Info, Step};

/// An observation of an environment.
pub trait Obs: Clone + Debug {}

/// An observation given as an image of `u8` pixels.
///
/// Agents working on pixels stack these into batches without knowing the
/// concrete observation type.
pub trait PixelObs: Obs {
    /// Returns the shape of the image as `[height, width, channels]`.
    fn shape(&self) -> [usize; 3];

    /// Returns the pixels in row-major `height x width x channels` order.
    fn pixels(&self) -> &[u8];
}

/// An action of an environment.
pub trait Act: Clone + Debug {}

/// An action taken from a finite set, identified by its index.
pub trait DiscreteAct: Act {
    /// Constructs the action from its index.
    ///
    /// The index is not checked here; environments reject indices outside
    /// their action space when stepping.
    fn from_index(ix: usize) -> Self;

    /// Returns the index of the action.
    fn index(&self) -> usize;
}

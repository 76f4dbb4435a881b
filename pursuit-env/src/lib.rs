//! A grid pursuit-evasion game as an episodic environment.
//!
//! The player moves through a randomly generated maze, collecting items placed on
//! every open cell while avoiding a pursuer. The pursuer mostly wanders at random
//! and occasionally steps greedily toward the player.
//!
//! * [`Grid`] holds the maze and answers whether a pixel position is blocked.
//! * [`CollectibleSet`] holds the remaining items.
//! * [`Pursuer`] moves with a two-branch stochastic policy, see [`PursuerBranch`].
//! * [`PursuitEnv`] implements [`pursuit_core::Env`]; observations are RGB frames
//!   rendered from the state ([`PursuitObs`]), actions are [`PursuitAct`].
//!
//! Rewards per step: `-1` as the base cost, `+10` for collecting an item, `+100`
//! for collecting the last item and `-100` for being caught. Being caught takes
//! precedence over collecting.
//!
//! ```no_run
//! use anyhow::Result;
//! use pursuit_core::{DiscreteAct, Env as _};
//! use pursuit_env::{PursuitAct, PursuitEnv, PursuitEnvConfig};
//!
//! fn main() -> Result<()> {
//!     let config = PursuitEnvConfig::default();
//!     let mut env = PursuitEnv::build(&config, 42)?;
//!     let _obs = env.reset()?;
//!
//!     loop {
//!         let (step, _) = env.step(&PursuitAct::from_index(3))?;
//!         if step.is_done() {
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```
mod act;
mod collectible;
mod env;
mod grid;
mod obs;
mod pursuer;
mod render;
pub use act::PursuitAct;
pub use collectible::CollectibleSet;
pub use env::{Episode, EpisodeState, Layout, PursuitEnv, PursuitEnvConfig, RewardConfig};
pub use grid::{Cell, Grid, Position};
pub use obs::PursuitObs;
pub use pursuer::{Direction, Pursuer, PursuerBranch};
pub use render::Renderer;

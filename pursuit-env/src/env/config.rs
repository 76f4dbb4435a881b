//! Configuration of [PursuitEnv](super::PursuitEnv).
use anyhow::Result;
use pursuit_core::error::PursuitError;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Rewards of the game.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RewardConfig {
    /// Base reward of every step.
    pub step: f32,

    /// Reward for collecting an item.
    pub collect: f32,

    /// Reward for collecting the last item; replaces `collect`.
    pub clear: f32,

    /// Reward for being caught; replaces every other reward.
    pub caught: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            step: -1.0,
            collect: 10.0,
            clear: 100.0,
            caught: -100.0,
        }
    }
}

/// Configurations of [`PursuitEnv`](super::PursuitEnv).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PursuitEnvConfig {
    pub(super) rows: usize,
    pub(super) cols: usize,
    pub(super) tile_size: i32,
    pub(super) step_size: i32,
    pub(super) open_probability: f64,
    pub(super) random_move_probability: f64,
    pub(super) collision_radius: i32,
    pub(super) pursuer_radius: i32,
    pub(super) collectible_radius: i32,
    #[serde(default)]
    pub(super) reward: RewardConfig,
}

impl Default for PursuitEnvConfig {
    fn default() -> Self {
        Self {
            rows: 11,
            cols: 16,
            tile_size: 40,
            step_size: 10,
            open_probability: 0.8,
            random_move_probability: 0.9,
            collision_radius: 20,
            pursuer_radius: 20,
            collectible_radius: 5,
            reward: RewardConfig::default(),
        }
    }
}

impl PursuitEnvConfig {
    /// Sets the size of the grid.
    pub fn grid_size(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Sets the tile size in pixels.
    ///
    /// Derived lengths follow it: the step size becomes a quarter of a tile,
    /// the player and pursuer radii half a tile and the collectible radius an eighth.
    pub fn tile_size(mut self, v: i32) -> Self {
        self.tile_size = v;
        self.step_size = v / 4;
        self.collision_radius = v / 2;
        self.pursuer_radius = v / 2;
        self.collectible_radius = (v / 8).max(1);
        self
    }

    /// Sets the number of pixels moved per step.
    pub fn step_size(mut self, v: i32) -> Self {
        self.step_size = v;
        self
    }

    /// Sets the probability that an interior cell is open.
    pub fn open_probability(mut self, v: f64) -> Self {
        self.open_probability = v;
        self
    }

    /// Sets the probability that the pursuer moves at random in a step.
    pub fn random_move_probability(mut self, v: f64) -> Self {
        self.random_move_probability = v;
        self
    }

    /// Sets the collision radius, also the drawn radius of the player.
    pub fn collision_radius(mut self, v: i32) -> Self {
        self.collision_radius = v;
        self
    }

    /// Sets the rewards.
    pub fn reward(mut self, v: RewardConfig) -> Self {
        self.reward = v;
        self
    }

    /// Returns the number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Shape of observations, `[height, width, 3]`.
    pub fn obs_shape(&self) -> [usize; 3] {
        let tile = self.tile_size.max(0) as usize;
        [self.rows * tile, self.cols * tile, 3]
    }

    /// The number of actions.
    pub fn n_actions(&self) -> usize {
        4
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(PursuitError::InvalidConfig(msg).into()) };

        if self.rows < 3 || self.cols < 3 {
            return invalid(format!("grid {}x{} is smaller than 3x3", self.rows, self.cols));
        }
        if self.tile_size <= 0 || self.step_size <= 0 || self.collision_radius <= 0 {
            return invalid("tile_size, step_size and collision_radius must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.open_probability) {
            return invalid(format!("open_probability {} is not in [0, 1]", self.open_probability));
        }
        if !(0.0..=1.0).contains(&self.random_move_probability) {
            return invalid(format!(
                "random_move_probability {} is not in [0, 1]",
                self.random_move_probability
            ));
        }
        Ok(())
    }

    /// Constructs [`PursuitEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`PursuitEnvConfig`] as a YAML file.
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
    fn test_defaults() {
        let config = PursuitEnvConfig::default();
        assert_eq!(config.obs_shape(), [440, 640, 3]);
        assert_eq!(config.step_size, config.tile_size / 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(PursuitEnvConfig::default().grid_size(2, 5).validate().is_err());
        assert!(PursuitEnvConfig::default().open_probability(1.5).validate().is_err());
        assert!(PursuitEnvConfig::default().step_size(0).validate().is_err());
    }

    #[test]
    fn test_serde() -> Result<()> {
        let config = PursuitEnvConfig::default().tile_size(8).grid_size(5, 6);
        let dir = TempDir::new("env_config")?;
        let path = dir.path().join("env.yaml");
        config.save(&path)?;
        assert_eq!(PursuitEnvConfig::load(&path)?, config);
        Ok(())
    }
}

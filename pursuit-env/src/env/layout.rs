//! Explicit initial states of episodes.
use crate::{CollectibleSet, Grid, Position};
use anyhow::Result;
use pursuit_core::error::PursuitError;
use rand::Rng;

/// The initial state of an episode: maze, spawns and collectibles.
///
/// [`PursuitEnv::reset`](super::PursuitEnv) draws a random layout;
/// [`PursuitEnv::reset_to`](super::PursuitEnv::reset_to) starts from a given one.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    /// The maze.
    pub grid: Grid,

    /// Spawn of the player.
    pub player: Position,

    /// Spawn of the pursuer.
    pub pursuer: Position,

    /// Collectibles in placement order.
    pub collectibles: Vec<Position>,
}

impl Layout {
    /// Draws spawns on `grid` and puts a collectible on every open cell.
    ///
    /// Spawns are top-left pixels of open cells off the border ring, drawn
    /// uniformly by rejection: the player first, then the pursuer independently.
    pub fn random<R: Rng + ?Sized>(grid: Grid, rng: &mut R) -> Result<Self> {
        if !grid.has_open_interior() {
            return Err(PursuitError::InvalidState("the maze has no open cell".into()).into());
        }
        let player = random_open_position(&grid, rng);
        let pursuer = random_open_position(&grid, rng);
        let collectibles = CollectibleSet::from_grid(&grid).iter().copied().collect();

        Ok(Self {
            grid,
            player,
            pursuer,
            collectibles,
        })
    }

    /// Checks that spawns and collectibles are open and there is something to collect.
    pub fn validate(&self) -> Result<()> {
        for (name, pos) in [("player", self.player), ("pursuer", self.pursuer)].iter() {
            if self.grid.is_blocked(*pos) {
                return Err(PursuitError::InvalidConfig(format!(
                    "{} spawn {:?} is blocked",
                    name, pos
                ))
                .into());
            }
        }
        if let Some(pos) = self.collectibles.iter().find(|c| self.grid.is_blocked(**c)) {
            return Err(PursuitError::InvalidConfig(format!(
                "collectible {:?} is blocked",
                pos
            ))
            .into());
        }
        if self.collectibles.is_empty() {
            return Err(PursuitError::InvalidConfig("no collectible in the layout".into()).into());
        }
        Ok(())
    }
}

/// Requires an open interior cell, otherwise this never returns.
fn random_open_position<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Position {
    loop {
        let col = rng.gen_range(1..grid.cols() - 1);
        let row = rng.gen_range(1..grid.rows() - 1);
        if !grid.is_blocked(grid.cell_origin(row, col)) {
            return grid.cell_origin(row, col);
        }
    }
}

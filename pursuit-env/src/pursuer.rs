//! Movement of the pursuer.
use crate::{Grid, Position};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

/// Movement directions, in the order of action indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Direction {
    /// Decreasing `y`.
    Up,
    /// Increasing `y`.
    Down,
    /// Decreasing `x`.
    Left,
    /// Increasing `x`.
    Right,
}

impl Direction {
    /// All directions in index order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns the direction of an action index.
    pub fn from_index(ix: usize) -> Option<Self> {
        Self::ALL.get(ix).copied()
    }

    /// Returns the action index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Pixel displacement of a move of `step` pixels.
    pub fn delta(self, step: i32) -> (i32, i32) {
        match self {
            Self::Up => (0, -step),
            Self::Down => (0, step),
            Self::Left => (-step, 0),
            Self::Right => (step, 0),
        }
    }
}

/// The policy used by the pursuer for a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PursuerBranch {
    /// Move to the first open direction of a shuffled order.
    Random,

    /// Move to the open direction closest to the player in Manhattan distance.
    Greedy,
}

impl PursuerBranch {
    /// Chooses a branch with a single uniform draw.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R, random_move_probability: f64) -> Self {
        if rng.gen::<f64>() < random_move_probability {
            Self::Random
        } else {
            Self::Greedy
        }
    }
}

/// The pursuer. It has no memory across ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct Pursuer {
    position: Position,
    step_size: i32,
    random_move_probability: f64,
}

impl Pursuer {
    /// Constructs a pursuer at `position`.
    pub fn new(position: Position, step_size: i32, random_move_probability: f64) -> Self {
        Self {
            position,
            step_size,
            random_move_probability,
        }
    }

    /// Current position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Moves one tick toward (or around) `target` and returns the branch taken.
    ///
    /// The pursuer stays in place when no direction is open.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        target: &Position,
        rng: &mut R,
    ) -> PursuerBranch {
        let branch = PursuerBranch::draw(rng, self.random_move_probability);
        let next = match branch {
            PursuerBranch::Random => self.random_move(grid, rng),
            PursuerBranch::Greedy => self.greedy_move(grid, target),
        };
        if let Some(next) = next {
            self.position = next;
        }
        branch
    }

    fn moved(&self, dir: Direction) -> Position {
        let (dx, dy) = dir.delta(self.step_size);
        self.position.offset(dx, dy)
    }

    fn random_move<R: Rng + ?Sized>(&self, grid: &Grid, rng: &mut R) -> Option<Position> {
        let mut dirs = Direction::ALL;
        dirs.shuffle(rng);
        dirs.iter()
            .map(|d| self.moved(*d))
            .find(|p| !grid.is_blocked(*p))
    }

    /// Strictly smaller distances win, so ties go to the earlier direction.
    fn greedy_move(&self, grid: &Grid, target: &Position) -> Option<Position> {
        let mut best: Option<(i32, Position)> = None;
        for dir in Direction::ALL.iter() {
            let p = self.moved(*dir);
            if grid.is_blocked(p) {
                continue;
            }
            let dist = p.manhattan(target);
            if best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, p));
            }
        }
        best.map(|(_, p)| p)
    }
}

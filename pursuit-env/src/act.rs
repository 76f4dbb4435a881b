//! Action for [`PursuitEnv`](crate::PursuitEnv).
use crate::Direction;
use pursuit_core::{Act, DiscreteAct};

/// Action for [`PursuitEnv`](crate::PursuitEnv): `0` up, `1` down, `2` left, `3` right.
///
/// Any index can be held; indices outside `0..4` are rejected when stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PursuitAct {
    /// Index of the action.
    pub act: usize,
}

impl PursuitAct {
    /// Constructs an action from its index.
    pub fn new(act: usize) -> Self {
        Self { act }
    }

    /// Returns the direction, or `None` for an invalid index.
    pub fn direction(&self) -> Option<Direction> {
        Direction::from_index(self.act)
    }
}

impl Act for PursuitAct {}

impl DiscreteAct for PursuitAct {
    fn from_index(ix: usize) -> Self {
        Self::new(ix)
    }

    fn index(&self) -> usize {
        self.act
    }
}

impl From<Direction> for PursuitAct {
    fn from(dir: Direction) -> Self {
        Self::new(dir.index())
    }
}

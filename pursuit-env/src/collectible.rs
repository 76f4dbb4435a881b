//! Remaining collectibles of an episode.
use crate::{Grid, Position};

/// Collectibles in placement order. The set only shrinks during an episode.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectibleSet {
    items: Vec<Position>,
}

impl CollectibleSet {
    /// Places one collectible on the center of every open cell, row by row.
    pub fn from_grid(grid: &Grid) -> Self {
        let items = grid
            .open_cells()
            .map(|(row, col)| grid.cell_center(row, col))
            .collect();
        Self { items }
    }

    /// Constructs a set from explicit positions, kept in the given order.
    pub fn from_positions(items: Vec<Position>) -> Self {
        Self { items }
    }

    /// Index of the first collectible within `radius` of `pos`.
    pub fn find_near(&self, pos: &Position, radius: i32) -> Option<usize> {
        self.items.iter().position(|item| pos.is_near(item, radius))
    }

    /// Removes and returns the first collectible within `radius` of `pos`.
    pub fn collect_near(&mut self, pos: &Position, radius: i32) -> Option<Position> {
        self.find_near(pos, radius).map(|ix| self.items.remove(ix))
    }

    /// The number of remaining collectibles.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if all collectibles have been collected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over remaining collectibles in placement order.
    pub fn iter(&self) -> std::slice::Iter<'_, Position> {
        self.items.iter()
    }
}

//! Maze grid and pixel positions.
use anyhow::Result;
use pursuit_core::error::PursuitError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A position in pixel space.
///
/// The cell containing a position is `(y.div_euclid(tile_size), x.div_euclid(tile_size))`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: i32,

    /// Vertical coordinate, growing downward.
    pub y: i32,
}

impl Position {
    /// Constructs a position.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position shifted by `(dx, dy)`.
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Manhattan distance.
    pub fn manhattan(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Returns `true` if both axis-wise distances are strictly less than `radius`.
    pub fn is_near(&self, other: &Position, radius: i32) -> bool {
        (self.x - other.x).abs() < radius && (self.y - other.y).abs() < radius
    }
}

/// A cell of the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Cell {
    /// Impassable.
    Wall,

    /// Passable; holds a collectible at the start of an episode.
    Open,
}

/// Occupancy grid of the maze, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    tile_size: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Generates a maze.
    ///
    /// The border ring is always [`Cell::Wall`]. Each interior cell is [`Cell::Open`]
    /// independently with probability `open_probability`, drawn row by row.
    /// Connectivity of open cells is not guaranteed.
    pub fn generate<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        tile_size: i32,
        open_probability: f64,
        rng: &mut R,
    ) -> Self {
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let is_border = row == 0 || col == 0 || row + 1 == rows || col + 1 == cols;
                let cell = if !is_border && rng.gen::<f64>() < open_probability {
                    Cell::Open
                } else {
                    Cell::Wall
                };
                cells.push(cell);
            }
        }

        Self {
            rows,
            cols,
            tile_size,
            cells,
        }
    }

    /// Constructs a grid from cells in row-major order.
    pub fn from_cells(rows: usize, cols: usize, tile_size: i32, cells: Vec<Cell>) -> Result<Self> {
        if tile_size <= 0 {
            return Err(
                PursuitError::InvalidConfig(format!("tile size {} is not positive", tile_size)).into(),
            );
        }
        if cells.len() != rows * cols {
            return Err(PursuitError::ShapeMismatch(format!(
                "{} cells given for a {}x{} grid",
                cells.len(),
                rows,
                cols
            ))
            .into());
        }
        Ok(Self {
            rows,
            cols,
            tile_size,
            cells,
        })
    }

    /// Parses a grid drawn with `#` for walls and `.` for open cells, one string per row.
    pub fn parse(lines: &[&str], tile_size: i32) -> Result<Self> {
        let rows = lines.len();
        let cols = lines.first().map(|l| l.chars().count()).unwrap_or(0);
        let mut cells = Vec::with_capacity(rows * cols);

        for line in lines {
            for c in line.chars() {
                match c {
                    '#' => cells.push(Cell::Wall),
                    '.' => cells.push(Cell::Open),
                    _ => {
                        return Err(PursuitError::InvalidConfig(format!(
                            "unexpected character {:?} in grid",
                            c
                        ))
                        .into())
                    }
                }
            }
        }

        Self::from_cells(rows, cols, tile_size, cells)
    }

    /// The number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Side length of a cell in pixels.
    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Returns the cell at `(row, col)`, or `None` outside the grid.
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Returns `true` if `pos` lies on a wall or outside the grid.
    ///
    /// This is the only collision query used for movement.
    pub fn is_blocked(&self, pos: Position) -> bool {
        let row = pos.y.div_euclid(self.tile_size);
        let col = pos.x.div_euclid(self.tile_size);
        if row < 0 || col < 0 {
            return true;
        }
        !matches!(self.cell(row as usize, col as usize), Some(Cell::Open))
    }

    /// Top-left pixel of a cell.
    pub fn cell_origin(&self, row: usize, col: usize) -> Position {
        Position::new(col as i32 * self.tile_size, row as i32 * self.tile_size)
    }

    /// Center pixel of a cell.
    pub fn cell_center(&self, row: usize, col: usize) -> Position {
        let half = self.tile_size / 2;
        self.cell_origin(row, col).offset(half, half)
    }

    /// Iterates over `(row, col)` of open cells in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Open)
            .map(move |(i, _)| (i / cols, i % cols))
    }

    /// Returns `true` if some cell off the border ring is open.
    pub fn has_open_interior(&self) -> bool {
        self.open_cells().any(|(row, col)| {
            row > 0 && col > 0 && row + 1 < self.rows && col + 1 < self.cols
        })
    }
}

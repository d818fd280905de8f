//! Row-major coordinate math for square grids.
//!
//! Cells are numbered left-to-right, top-to-bottom: on a grid of size `n`,
//! `row = index / n` and `col = index % n`. Nothing here holds state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;

/// Smallest grid that still has a legal move from every cell.
pub const MIN_GRID_SIZE: usize = 2;

/// Largest grid whose tile identities fit comfortably in a `u16`.
pub const MAX_GRID_SIZE: usize = 16;

/// Side length of a square puzzle grid, validated to `2..=16`.
///
/// Every engine entry point takes a `GridSize`, so an invalid dimension is
/// rejected once at construction instead of being clamped differently in
/// each function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct GridSize(usize);

impl GridSize {
    /// Validate a side length.
    pub fn new(size: usize) -> Result<Self, PuzzleError> {
        if (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
            Ok(GridSize(size))
        } else {
            Err(PuzzleError::InvalidGridSize(size))
        }
    }

    /// Side length.
    pub fn get(self) -> usize {
        self.0
    }

    /// Number of cells, `size * size`.
    pub fn cell_count(self) -> usize {
        self.0 * self.0
    }

    /// Whether `index` addresses a cell on this grid.
    pub fn contains(self, index: usize) -> bool {
        index < self.cell_count()
    }
}

impl TryFrom<usize> for GridSize {
    type Error = PuzzleError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        GridSize::new(value)
    }
}

impl From<GridSize> for usize {
    fn from(size: GridSize) -> usize {
        size.0
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.0, self.0)
    }
}

/// Direction a tile travels when it slides into the empty cell.
///
/// `Up` moves the tile directly below the hole upwards, which is what an
/// "up" arrow key or an upward swipe means to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    /// Convert a u8 to a Direction (0=Up, 1=Down, 2=Left, 3=Right).
    /// Returns None for invalid values.
    pub fn from_u8(value: u8) -> Option<Direction> {
        match value {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Right),
            _ => None,
        }
    }

    /// Get all four directions.
    pub fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Split a cell index into `(row, col)`. `None` if the index is off the grid.
pub fn to_row_col(index: usize, size: GridSize) -> Option<(usize, usize)> {
    size.contains(index)
        .then(|| (index / size.get(), index % size.get()))
}

/// Join `(row, col)` back into a cell index. `None` if either is off the grid.
pub fn index_of(row: usize, col: usize, size: GridSize) -> Option<usize> {
    (row < size.get() && col < size.get()).then(|| row * size.get() + col)
}

/// The cell next to `index` in `direction`, if there is one.
pub fn neighbor_toward(index: usize, direction: Direction, size: GridSize) -> Option<usize> {
    let (row, col) = to_row_col(index, size)?;
    match direction {
        Direction::Up => row.checked_sub(1).and_then(|r| index_of(r, col, size)),
        Direction::Down => index_of(row + 1, col, size),
        Direction::Left => col.checked_sub(1).and_then(|c| index_of(row, c, size)),
        Direction::Right => index_of(row, col + 1, size),
    }
}

/// Cells sharing an edge with `index`, in up, down, left, right order.
///
/// Empty when `index` is off the grid.
pub fn neighbors(index: usize, size: GridSize) -> Vec<usize> {
    Direction::all()
        .into_iter()
        .filter_map(|direction| neighbor_toward(index, direction, size))
        .collect()
}

/// Whether two cells share an edge.
pub fn are_adjacent(a: usize, b: usize, size: GridSize) -> bool {
    match (to_row_col(a, size), to_row_col(b, size)) {
        (Some((ra, ca)), Some((rb, cb))) => ra.abs_diff(rb) + ca.abs_diff(cb) == 1,
        _ => false,
    }
}

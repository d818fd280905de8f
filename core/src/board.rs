//! Board state: the arrangement of tile identities and the single empty cell.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PuzzleError;
use crate::grid::{neighbor_toward, Direction, GridSize};
use crate::moves::{resolve, MoveSequence};

/// Numeric identity of a tile, `1..size²`. Independent of how it is displayed.
pub type TileId = u16;

/// One board position. `None` is the empty cell.
pub type Cell = Option<TileId>;

/// Tile identities in row-major order plus the empty cell.
///
/// A `Board` always holds every identity in `1..size²` exactly once and one
/// empty cell; slides are pure swaps so the invariant survives every move.
/// Cloning produces an independent snapshot, which is what history relies on.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoard", into = "RawBoard")]
pub struct Board {
    size: GridSize,
    cells: Vec<Cell>,
    empty: usize,
}

/// Canonical solved configuration for `size`.
pub fn target_state(size: GridSize) -> Board {
    Board::solved(size)
}

/// Whether `cells` is exactly the solved configuration for `size`.
///
/// A slice of the wrong length is simply not solved.
pub fn is_solved(cells: &[Cell], size: GridSize) -> bool {
    let last = size.cell_count() - 1;
    cells.len() == size.cell_count()
        && cells.iter().enumerate().all(|(i, &cell)| {
            if i == last {
                cell.is_none()
            } else {
                cell == Some(i as TileId + 1)
            }
        })
}

impl Board {
    /// The solved board: tiles `1..size²` in order, empty cell last.
    pub fn solved(size: GridSize) -> Self {
        let count = size.cell_count();
        let cells = (1..count)
            .map(|id| Some(id as TileId))
            .chain(std::iter::once(None))
            .collect();
        Board {
            size,
            cells,
            empty: count - 1,
        }
    }

    /// Build a board from externally supplied cells, checking the invariant.
    pub fn from_cells(size: GridSize, cells: Vec<Cell>) -> Result<Self, PuzzleError> {
        let count = size.cell_count();
        if cells.len() != count {
            return Err(PuzzleError::MalformedBoard(format!(
                "expected {count} cells for a {size} grid, got {}",
                cells.len()
            )));
        }

        let mut seen = vec![false; count];
        let mut empty = None;
        for (index, cell) in cells.iter().enumerate() {
            match *cell {
                None if empty.is_some() => {
                    return Err(PuzzleError::MalformedBoard(
                        "more than one empty cell".to_string(),
                    ));
                }
                None => empty = Some(index),
                Some(id) if id == 0 || id as usize >= count => {
                    return Err(PuzzleError::MalformedBoard(format!(
                        "tile {id} is outside 1..{count}"
                    )));
                }
                Some(id) if seen[id as usize] => {
                    return Err(PuzzleError::MalformedBoard(format!(
                        "tile {id} appears twice"
                    )));
                }
                Some(id) => seen[id as usize] = true,
            }
        }

        let empty =
            empty.ok_or_else(|| PuzzleError::MalformedBoard("no empty cell".to_string()))?;
        Ok(Board { size, cells, empty })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at `index`, or `None` when off the grid.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Index of the empty cell.
    pub fn empty_index(&self) -> usize {
        self.empty
    }

    pub fn is_solved(&self) -> bool {
        is_solved(&self.cells, self.size)
    }

    /// Number of tiles not on their home cell.
    pub fn misplaced(&self) -> usize {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(i, cell)| matches!(cell, Some(id) if *id as usize != i + 1))
            .count()
    }

    /// Sum over all tiles of the grid distance to their home cell.
    pub fn manhattan_distance(&self) -> usize {
        let n = self.size.get();
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.map(|id| (i, id as usize - 1)))
            .map(|(i, home)| (i / n).abs_diff(home / n) + (i % n).abs_diff(home % n))
            .sum()
    }

    /// Apply a resolved slide as a single transition.
    ///
    /// The sequence must start at this board's empty cell; otherwise the
    /// board is left untouched.
    pub fn apply(&mut self, sequence: &MoveSequence) -> Result<(), PuzzleError> {
        if sequence.size() != self.size {
            return Err(PuzzleError::MalformedBoard(format!(
                "move resolved for a {} grid applied to a {} grid",
                sequence.size(),
                self.size
            )));
        }
        if sequence.origin() != self.empty {
            return Err(PuzzleError::StaleMove {
                expected: sequence.origin(),
                actual: self.empty,
            });
        }

        for &cell in sequence {
            self.cells.swap(self.empty, cell);
            self.empty = cell;
        }
        debug!(
            origin = sequence.origin(),
            target = sequence.target(),
            shifted = sequence.len(),
            "applied slide"
        );
        Ok(())
    }

    /// Resolve `target` against the current empty cell and apply it.
    ///
    /// Returns the applied sequence, or `None` if the request was not a legal
    /// slide.
    pub fn slide(&mut self, target: usize) -> Option<MoveSequence> {
        let sequence = resolve(target, self.empty, self.size)?;
        self.apply(&sequence).ok()?;
        Some(sequence)
    }

    /// Slide the single tile that would travel in `direction` into the hole.
    pub fn slide_direction(&mut self, direction: Direction) -> Option<MoveSequence> {
        let source = neighbor_toward(self.empty, direction.opposite(), self.size)?;
        self.slide(source)
    }

    /// Swap the empty cell with an adjacent cell. Used by the shuffler's walk.
    pub(crate) fn step_empty(&mut self, to: usize) {
        self.cells.swap(self.empty, to);
        self.empty = to;
    }
}

#[derive(Serialize, Deserialize)]
struct RawBoard {
    size: GridSize,
    cells: Vec<Cell>,
}

impl TryFrom<RawBoard> for Board {
    type Error = PuzzleError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        Board::from_cells(raw.size, raw.cells)
    }
}

impl From<Board> for RawBoard {
    fn from(board: Board) -> Self {
        RawBoard {
            size: board.size,
            cells: board.cells,
        }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{ size: {}, empty: {} }}", self.size, self.empty)?;
        for row in self.cells.chunks(self.size.get()) {
            for cell in row {
                match cell {
                    Some(id) => write!(f, "{:4}", id)?,
                    None => write!(f, "   .")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.size.get();
        let separator = format!("+{}", "------+".repeat(n));
        writeln!(f, "{}", separator)?;
        for row in self.cells.chunks(n) {
            write!(f, "|")?;
            for cell in row {
                match cell {
                    Some(id) => write!(f, "{:^6}|", id)?,
                    None => write!(f, "      |")?,
                }
            }
            writeln!(f)?;
            writeln!(f, "{}", separator)?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

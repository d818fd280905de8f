//! Solvable scrambles by random walk from the solved state.
//!
//! The empty cell takes a walk of legal steps starting from the target
//! configuration. Every step is a legal slide, so the reverse walk is always
//! a solution and no parity check is ever needed.

use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, warn};

use crate::board::Board;
use crate::error::PuzzleError;
use crate::grid::{neighbors, GridSize};

/// Walks that land back on the solved board are retried at most this often.
pub const MAX_SHUFFLE_ATTEMPTS: u32 = 16;

/// How hard a scramble is. Controls walk length per unit of grid size.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Walk steps per unit of grid side length.
    pub fn factor(self) -> usize {
        match self {
            Difficulty::Easy => 8,
            Difficulty::Medium => 25,
            Difficulty::Hard => 60,
        }
    }
}

/// Number of random-walk steps for a grid and difficulty.
///
/// Proportional to the grid size so larger boards get a proportionally
/// longer scramble.
pub fn walk_length(size: GridSize, difficulty: Difficulty) -> usize {
    size.get() * difficulty.factor()
}

/// A scrambled board together with the walk that produced it.
#[derive(Debug, Clone)]
pub struct Scramble {
    board: Board,
    path: Vec<usize>,
}

impl Scramble {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    /// Position of the empty cell after each step of the walk.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Cells to slide, one tile at a time, to walk back to the solved board.
    pub fn solution(&self) -> Vec<usize> {
        let start = self.board.size().cell_count() - 1;
        self.path
            .iter()
            .rev()
            .skip(1)
            .copied()
            .chain((!self.path.is_empty()).then_some(start))
            .collect()
    }
}

/// Scramble a board of `size` using `rng` for every random choice.
///
/// The walk never immediately steps back to the cell it just left. If the
/// walk happens to end on the solved board it is retried one step longer, up
/// to [`MAX_SHUFFLE_ATTEMPTS`] times; running out of attempts is reported as
/// [`PuzzleError::ShuffleExhausted`] rather than looping forever.
///
/// The growing length matters on 2x2, where the walk is forced around the
/// ring and any length divisible by 12 lands back on solved.
pub fn shuffle<R: Rng + ?Sized>(
    size: GridSize,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<Scramble, PuzzleError> {
    let steps = walk_length(size, difficulty);

    for attempt in 1..=MAX_SHUFFLE_ATTEMPTS {
        let steps = steps + attempt as usize - 1;
        let scramble = random_walk(size, steps, rng);
        if !scramble.board.is_solved() {
            debug!(%size, %difficulty, steps, attempt, "shuffled board");
            return Ok(scramble);
        }
        debug!(%size, %difficulty, attempt, "walk returned to solved state, retrying");
    }

    warn!(%size, %difficulty, attempts = MAX_SHUFFLE_ATTEMPTS, "shuffle kept returning to solved state");
    Err(PuzzleError::ShuffleExhausted {
        attempts: MAX_SHUFFLE_ATTEMPTS,
    })
}

fn random_walk<R: Rng + ?Sized>(size: GridSize, steps: usize, rng: &mut R) -> Scramble {
    let mut board = Board::solved(size);
    let mut path = Vec::with_capacity(steps);
    let mut previous = None;

    for _ in 0..steps {
        let empty = board.empty_index();
        let options = neighbors(empty, size);
        let mut candidates: Vec<usize> = options
            .iter()
            .copied()
            .filter(|&index| Some(index) != previous)
            .collect();
        if candidates.is_empty() {
            candidates = options;
        }

        let next = candidates[rng.gen_range(0..candidates.len())];
        board.step_empty(next);
        previous = Some(empty);
        path.push(next);
    }

    Scramble { board, path }
}

//! A single player's puzzle session: the board plus counters and history.

use std::fmt;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::board::Board;
use crate::display::{Labels, TileMode};
use crate::error::PuzzleError;
use crate::grid::{Direction, GridSize};
use crate::moves::MoveSequence;
use crate::shuffle::{shuffle, Difficulty};

/// Everything that identifies a kind of puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PuzzleConfig {
    pub size: GridSize,
    pub mode: TileMode,
    pub difficulty: Difficulty,
}

impl PuzzleConfig {
    pub fn new(size: GridSize, mode: TileMode, difficulty: Difficulty) -> Self {
        PuzzleConfig {
            size,
            mode,
            difficulty,
        }
    }

    /// Key under which best scores for this configuration are kept, e.g. `"4-numbers"`.
    pub fn score_key(&self) -> String {
        format!("{}-{}", self.size.get(), self.mode)
    }
}

/// Result of a slide request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlideResult {
    /// Whether the board changed.
    pub changed: bool,
    /// Tiles shifted by this slide.
    pub moved: usize,
    /// Whether the puzzle is solved after the slide.
    pub solved: bool,
}

/// One puzzle instance being played.
///
/// Owns the seeded random source used for shuffling and labels, so the same
/// seed and the same inputs always replay the same game.
#[derive(Clone)]
pub struct Session {
    config: PuzzleConfig,
    rng: SmallRng,
    board: Board,
    labels: Labels,
    history: Vec<(Board, usize)>,
    moves: u32,
    elapsed: u64,
    active: bool,
    won: bool,
}

impl Session {
    /// Start a freshly shuffled puzzle.
    #[instrument]
    pub fn new(config: PuzzleConfig, seed: u64) -> Result<Self, PuzzleError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let (board, labels) = Self::deal(&config, &mut rng)?;
        info!(key = %config.score_key(), "new puzzle");
        Ok(Session {
            config,
            rng,
            board,
            labels,
            history: Vec::new(),
            moves: 0,
            elapsed: 0,
            active: false,
            won: false,
        })
    }

    /// Reset to a new puzzle with a new seed.
    pub fn reset(&mut self, seed: u64) -> Result<(), PuzzleError> {
        *self = Session::new(self.config, seed)?;
        Ok(())
    }

    /// Shuffle a new puzzle with the same configuration, continuing the
    /// current random sequence. On error the current puzzle is kept.
    #[instrument(skip(self), fields(key = %self.config.score_key()))]
    pub fn restart(&mut self) -> Result<(), PuzzleError> {
        let (board, labels) = Self::deal(&self.config, &mut self.rng)?;
        self.board = board;
        self.labels = labels;
        self.clear_progress();
        info!("restarted puzzle");
        Ok(())
    }

    /// Switch to another configuration and shuffle a new puzzle for it.
    #[instrument(skip(self))]
    pub fn reconfigure(&mut self, config: PuzzleConfig) -> Result<(), PuzzleError> {
        let (board, labels) = Self::deal(&config, &mut self.rng)?;
        self.config = config;
        self.board = board;
        self.labels = labels;
        self.clear_progress();
        Ok(())
    }

    /// Slide the tile at `index` (and any tiles between it and the hole).
    ///
    /// Ignored once the puzzle is solved, or when `index` is not in line with
    /// the empty cell.
    pub fn slide(&mut self, index: usize) -> SlideResult {
        if self.won {
            return self.unchanged();
        }

        let snapshot = self.board.clone();
        match self.board.slide(index) {
            Some(sequence) => self.accept(snapshot, &sequence),
            None => self.unchanged(),
        }
    }

    /// Slide the tile that travels in `direction` into the hole.
    pub fn slide_direction(&mut self, direction: Direction) -> SlideResult {
        if self.won {
            return self.unchanged();
        }

        let snapshot = self.board.clone();
        match self.board.slide_direction(direction) {
            Some(sequence) => self.accept(snapshot, &sequence),
            None => self.unchanged(),
        }
    }

    /// Take back the last slide. Returns false if there is nothing to undo or
    /// the puzzle is already solved.
    pub fn undo(&mut self) -> bool {
        if self.won {
            return false;
        }
        let Some((previous, moved)) = self.history.pop() else {
            return false;
        };

        self.board = previous;
        self.moves = self.moves.saturating_sub(moved as u32);
        if self.moves == 0 {
            self.active = false;
            self.elapsed = 0;
        }
        debug!(moves = self.moves, "undid slide");
        true
    }

    /// Advance the clock. Only counts while the puzzle is in progress.
    pub fn advance(&mut self, seconds: u64) {
        if self.active && !self.won {
            self.elapsed += seconds;
        }
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Labels for every cell, in board order.
    pub fn cell_labels(&self) -> Vec<String> {
        self.labels.for_board(&self.board)
    }

    /// Tiles shifted so far.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Seconds on the clock.
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    /// Whether the clock is running: the first slide has been made and the
    /// puzzle is not yet solved.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn can_undo(&self) -> bool {
        !self.won && !self.history.is_empty()
    }

    pub fn score_key(&self) -> String {
        self.config.score_key()
    }

    // -------------------------------------------------------------------------
    // Private methods
    // -------------------------------------------------------------------------

    fn deal(config: &PuzzleConfig, rng: &mut SmallRng) -> Result<(Board, Labels), PuzzleError> {
        let board = shuffle(config.size, config.difficulty, rng)?.into_board();
        let labels = Labels::generate(&board, config.mode, rng);
        Ok((board, labels))
    }

    fn clear_progress(&mut self) {
        self.history.clear();
        self.moves = 0;
        self.elapsed = 0;
        self.active = false;
        self.won = false;
    }

    fn accept(&mut self, snapshot: Board, sequence: &MoveSequence) -> SlideResult {
        self.history.push((snapshot, sequence.len()));
        self.moves += sequence.len() as u32;
        self.active = true;

        let solved = self.board.is_solved();
        if solved {
            self.won = true;
            self.active = false;
            info!(moves = self.moves, elapsed = self.elapsed, "puzzle solved");
        } else {
            debug!(target = sequence.target(), moves = self.moves, "slide");
        }

        SlideResult {
            changed: true,
            moved: sequence.len(),
            solved,
        }
    }

    fn unchanged(&self) -> SlideResult {
        SlideResult {
            changed: false,
            moved: 0,
            solved: self.won,
        }
    }
}

/// Format seconds as `MM:SS`.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Session {{ key: {}, moves: {}, elapsed: {}, won: {} }}",
            self.score_key(),
            self.moves,
            self.elapsed,
            self.won
        )?;
        write!(f, "{:?}", self.board)
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.config.size.get();
        let labels = self.cell_labels();
        let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0).max(4) + 2;
        let separator = format!("+{}", format!("{}+", "-".repeat(width)).repeat(n));

        writeln!(
            f,
            "Moves: {}  Time: {}",
            self.moves,
            format_elapsed(self.elapsed)
        )?;
        writeln!(f, "{}", separator)?;
        for row in labels.chunks(n) {
            write!(f, "|")?;
            for label in row {
                write!(f, "{:^width$}|", label, width = width)?;
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

#[cfg(test)]
mod tests {
    use super::*;

    fn config(n: usize, mode: TileMode) -> PuzzleConfig {
        PuzzleConfig::new(GridSize::new(n).unwrap(), mode, Difficulty::Easy)
    }

    /// Index of a tile in line with the hole, if any.
    fn legal_target(session: &Session) -> usize {
        crate::grid::neighbors(session.board().empty_index(), session.config().size)[0]
    }

    #[test]
    fn test_new_session_is_scrambled_and_idle() {
        let session = Session::new(config(4, TileMode::Numbers), 42).unwrap();
        assert!(!session.board().is_solved());
        assert_eq!(session.moves(), 0);
        assert_eq!(session.elapsed(), 0);
        assert!(!session.is_active());
        assert!(!session.is_won());
        assert!(!session.can_undo());
    }

    #[test]
    fn test_session_determinism() {
        let a = Session::new(config(4, TileMode::Math), 2024).unwrap();
        let b = Session::new(config(4, TileMode::Math), 2024).unwrap();
        assert_eq!(a.board(), b.board());
        assert_eq!(a.cell_labels(), b.cell_labels());
    }

    #[test]
    fn test_slide_counts_and_starts_clock() {
        let mut session = Session::new(config(3, TileMode::Numbers), 1).unwrap();
        session.advance(5);
        assert_eq!(session.elapsed(), 0);

        let result = session.slide(legal_target(&session));
        assert!(result.changed);
        assert_eq!(result.moved, 1);
        assert_eq!(session.moves(), 1);
        assert!(session.is_active());

        session.advance(3);
        assert_eq!(session.elapsed(), 3);
    }

    #[test]
    fn test_illegal_slide_is_ignored() {
        let mut session = Session::new(config(3, TileMode::Numbers), 1).unwrap();
        let before = session.board().clone();
        let empty = session.board().empty_index();
        let result = session.slide(empty);
        assert_eq!(
            result,
            SlideResult {
                changed: false,
                moved: 0,
                solved: false
            }
        );
        assert_eq!(session.board(), &before);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_multi_tile_slide_is_one_history_entry() {
        let mut session = Session::new(config(4, TileMode::Numbers), 3).unwrap();
        let empty = session.board().empty_index();
        let (row, col) = crate::grid::to_row_col(empty, session.config().size).unwrap();
        let far = if col >= 2 { row * 4 } else { row * 4 + 3 };
        let before = session.board().clone();

        let result = session.slide(far);
        assert!(result.changed);
        assert!(result.moved >= 2);
        assert_eq!(session.moves() as usize, result.moved);

        assert!(session.undo());
        assert_eq!(session.board(), &before);
        assert_eq!(session.moves(), 0);
        assert!(!session.undo());
    }

    #[test]
    fn test_undo_to_start_stops_clock() {
        let mut session = Session::new(config(3, TileMode::Numbers), 9).unwrap();
        session.slide(legal_target(&session));
        session.slide(legal_target(&session));
        session.advance(10);

        assert!(session.undo());
        assert_eq!(session.moves(), 1);
        assert_eq!(session.elapsed(), 10);
        assert!(session.is_active());

        assert!(session.undo());
        assert_eq!(session.moves(), 0);
        assert_eq!(session.elapsed(), 0);
        assert!(!session.is_active());
    }

    #[test]
    fn test_solving_freezes_session() {
        let cfg = config(3, TileMode::Numbers);
        let mut session = Session::new(cfg, 77).unwrap();

        // Replay the same shuffle to learn the way back.
        let mut rng = SmallRng::seed_from_u64(77);
        let scramble = shuffle(cfg.size, cfg.difficulty, &mut rng).unwrap();
        assert_eq!(scramble.board(), session.board());

        for cell in scramble.solution() {
            let result = session.slide(cell);
            assert!(result.changed);
            if result.solved {
                break;
            }
        }

        assert!(session.is_won());
        assert!(!session.is_active());
        assert!(session.moves() as usize <= scramble.path().len());

        let moves = session.moves();
        session.advance(30);
        assert_eq!(session.elapsed(), 0);
        assert!(!session.undo());
        assert!(!session.slide_direction(Direction::Up).changed);
        assert_eq!(session.moves(), moves);
    }

    #[test]
    fn test_restart_clears_progress() {
        let mut session = Session::new(config(3, TileMode::Letters), 5).unwrap();
        session.slide(legal_target(&session));
        session.advance(4);

        session.restart().unwrap();
        assert_eq!(session.moves(), 0);
        assert_eq!(session.elapsed(), 0);
        assert!(!session.can_undo());
        assert!(!session.board().is_solved());
    }

    #[test]
    fn test_reset_with_same_seed_replays() {
        let mut session = Session::new(config(4, TileMode::Numbers), 42).unwrap();
        session.slide(legal_target(&session));
        session.reset(42).unwrap();
        let fresh = Session::new(config(4, TileMode::Numbers), 42).unwrap();
        assert_eq!(session.board(), fresh.board());
        assert_eq!(session.moves(), 0);
    }

    #[test]
    fn test_reconfigure_changes_grid() {
        let mut session = Session::new(config(3, TileMode::Numbers), 5).unwrap();
        session.reconfigure(config(5, TileMode::Letters)).unwrap();
        assert_eq!(session.board().cells().len(), 25);
        assert_eq!(session.score_key(), "5-letters");
        assert_eq!(session.labels().mode(), TileMode::Letters);
    }

    #[test]
    fn test_minimum_grid_hard_sessions_start() {
        let tiny =
            PuzzleConfig::new(GridSize::new(2).unwrap(), TileMode::Numbers, Difficulty::Hard);
        for seed in 0..200 {
            let session = Session::new(tiny, seed).unwrap();
            assert!(!session.board().is_solved(), "seed {seed}");
        }

        let mut session = Session::new(config(3, TileMode::Numbers), 5).unwrap();
        session.reconfigure(tiny).unwrap();
        assert_eq!(session.score_key(), "2-numbers");
        assert!(!session.board().is_solved());
    }

    #[test]
    fn test_letter_labels_follow_tiles() {
        let session = Session::new(config(3, TileMode::Letters), 8).unwrap();
        for (cell, label) in session.board().cells().iter().zip(session.cell_labels()) {
            match cell {
                Some(id) => {
                    assert_eq!(label, crate::display::ALPHABET[*id as usize - 1].to_string())
                }
                None => assert!(label.is_empty()),
            }
        }
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(75), "01:15");
        assert_eq!(format_elapsed(3600), "60:00");
    }

    #[test]
    fn test_display_format() {
        let session = Session::new(config(3, TileMode::Numbers), 42).unwrap();
        let display = format!("{}", session);
        assert!(display.contains("Moves: 0"));
        assert!(display.contains("Time: 00:00"));
        assert!(display.contains("+------+"));
    }

    #[test]
    fn test_debug_format() {
        let session = Session::new(config(3, TileMode::Numbers), 42).unwrap();
        let debug = format!("{:?}", session);
        assert!(debug.contains("Session"));
        assert!(debug.contains("3-numbers"));
    }
}

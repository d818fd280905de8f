//! # Neon Slide Core Engine
//!
//! A pure Rust implementation of the N×N sliding-tile puzzle (the classic
//! 15-puzzle, generalized). The engine has no I/O: front ends hand it a
//! requested cell and render whatever it returns. Randomness is always
//! injected, so a seed reproduces a game exactly.
//!
//! ## Example
//!
//! ```rust
//! use neon_slide_core::{Difficulty, GridSize, PuzzleConfig, Session, TileMode};
//!
//! let config = PuzzleConfig::new(GridSize::new(4)?, TileMode::Numbers, Difficulty::Medium);
//! let mut session = Session::new(config, 42)?;  // Shuffle with seed 42
//! let result = session.slide(0);
//! println!("Moves: {}, Changed: {}", session.moves(), result.changed);
//! # Ok::<(), neon_slide_core::PuzzleError>(())
//! ```

pub mod board;
pub mod display;
pub mod error;
pub mod grid;
pub mod moves;
pub mod scores;
pub mod session;
pub mod shuffle;

pub use board::{is_solved, target_state, Board, Cell, TileId};
pub use display::{label, Labels, TileMode};
pub use error::{PuzzleError, StoreError};
pub use grid::{neighbors, to_row_col, Direction, GridSize};
pub use moves::{resolve, MoveSequence};
pub use scores::{KeyValueStore, MemoryStore, Preferences, ScoreBook};
pub use session::{format_elapsed, PuzzleConfig, Session, SlideResult};
pub use shuffle::{shuffle, walk_length, Difficulty, Scramble};

// =============================================================================
// Tests
// =============================================================================

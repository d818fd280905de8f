//! # Neon Slide WebAssembly Bindings
//!
//! This crate provides JavaScript-friendly bindings to the sliding-tile
//! puzzle engine using wasm-bindgen. It wraps a core `Session` in a
//! class-like API for the browser presentation layer, which stays in charge
//! of rendering, input, audio and localStorage.

use neon_slide_core::{
    format_elapsed, resolve, target_state, Board, Direction, GridSize, PuzzleConfig, Session,
    SlideResult,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Result of a slide, serialized for JavaScript.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsSlideResult {
    /// The updated board (row-major, 0 for the empty cell).
    pub board: Vec<u16>,
    /// Tiles shifted so far.
    pub moves: u32,
    /// Tiles shifted by this slide.
    pub moved: usize,
    /// Whether the board changed.
    pub changed: bool,
    /// Whether the puzzle is solved.
    pub solved: bool,
}

/// WebAssembly wrapper for one puzzle session.
#[wasm_bindgen]
pub struct WasmPuzzle {
    session: Session,
}

#[wasm_bindgen]
impl WasmPuzzle {
    /// Shuffle a new puzzle.
    ///
    /// - size: grid side length, 2-16
    /// - mode: "numbers", "letters" or "math"
    /// - difficulty: "easy", "medium" or "hard"
    /// - seed: 64-bit seed for the deterministic RNG
    #[wasm_bindgen(constructor)]
    pub fn new(size: usize, mode: &str, difficulty: &str, seed: u64) -> Result<WasmPuzzle, JsError> {
        let config = PuzzleConfig::new(GridSize::new(size)?, mode.parse()?, difficulty.parse()?);
        Ok(WasmPuzzle {
            session: Session::new(config, seed)?,
        })
    }

    /// Shuffle a new puzzle with the same settings.
    pub fn restart(&mut self) -> Result<(), JsError> {
        self.session.restart()?;
        Ok(())
    }

    /// Reset with a new seed.
    pub fn reset(&mut self, seed: u64) -> Result<(), JsError> {
        self.session.reset(seed)?;
        Ok(())
    }

    /// Slide the tile at `index`, plus any tiles between it and the hole.
    pub fn slide(&mut self, index: usize) -> JsValue {
        let result = self.session.slide(index);
        self.create_js_result(result)
    }

    /// Slide a single tile into the hole.
    ///
    /// Direction values (the way the tile travels):
    /// - 0 = Up
    /// - 1 = Down
    /// - 2 = Left
    /// - 3 = Right
    #[wasm_bindgen(js_name = slideDirection)]
    pub fn slide_direction(&mut self, direction: u8) -> JsValue {
        let result = match Direction::from_u8(direction) {
            Some(direction) => self.session.slide_direction(direction),
            None => SlideResult {
                changed: false,
                moved: 0,
                solved: self.session.is_won(),
            },
        };
        self.create_js_result(result)
    }

    /// Take back the last slide.
    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    /// Advance the clock; call from a one-second interval timer.
    pub fn advance(&mut self, seconds: u32) {
        self.session.advance(seconds as u64);
    }

    /// Get the board as a Uint16Array (row-major, 0 for the empty cell).
    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> Vec<u16> {
        board_to_js(self.session.board())
    }

    /// Get the label for each cell, in board order. Fixed for the puzzle.
    #[wasm_bindgen(js_name = getLabels)]
    pub fn get_labels(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.session.cell_labels()).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = getMoves)]
    pub fn get_moves(&self) -> u32 {
        self.session.moves()
    }

    /// Elapsed seconds.
    #[wasm_bindgen(js_name = getElapsed)]
    pub fn get_elapsed(&self) -> f64 {
        self.session.elapsed() as f64
    }

    /// Elapsed time as `MM:SS`.
    #[wasm_bindgen(js_name = getElapsedText)]
    pub fn get_elapsed_text(&self) -> String {
        format_elapsed(self.session.elapsed())
    }

    #[wasm_bindgen(js_name = isSolved)]
    pub fn is_solved(&self) -> bool {
        self.session.is_won()
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    /// Key for the best-score table, e.g. "4-numbers".
    #[wasm_bindgen(js_name = scoreKey)]
    pub fn score_key(&self) -> String {
        self.session.score_key()
    }

    /// Helper method to create a JS result object.
    fn create_js_result(&self, result: SlideResult) -> JsValue {
        let js_result = JsSlideResult {
            board: board_to_js(self.session.board()),
            moves: self.session.moves(),
            moved: result.moved,
            changed: result.changed,
            solved: result.solved,
        };
        serde_wasm_bindgen::to_value(&js_result).unwrap_or(JsValue::NULL)
    }
}

// =============================================================================
// Engine functions
// =============================================================================

/// The solved board for a grid size (0 for the empty cell).
#[wasm_bindgen(js_name = targetState)]
pub fn target_state_js(size: usize) -> Result<Vec<u16>, JsError> {
    Ok(board_to_js(&target_state(GridSize::new(size)?)))
}

/// Cells next to `index`, in up, down, left, right order.
#[wasm_bindgen]
pub fn neighbors(index: usize, size: usize) -> Result<Vec<usize>, JsError> {
    Ok(neon_slide_core::neighbors(index, GridSize::new(size)?))
}

/// Cells that slide when `target` is requested with the hole at `empty`,
/// nearest to the hole first. `null` if the move is not legal.
#[wasm_bindgen(js_name = resolveMove)]
pub fn resolve_move(target: usize, empty: usize, size: usize) -> Result<JsValue, JsError> {
    let cells = resolve(target, empty, GridSize::new(size)?).map(|seq| seq.cells().to_vec());
    Ok(serde_wasm_bindgen::to_value(&cells)?)
}

fn board_to_js(board: &Board) -> Vec<u16> {
    board.cells().iter().map(|cell| cell.unwrap_or(0)).collect()
}

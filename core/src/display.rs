//! Human-facing tile labels.
//!
//! Labels are presentation only. Logic always works on [`TileId`]; a label is
//! never compared or fed back into the board.

use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::board::{Board, Cell, TileId};

/// Alphabet used by [`TileMode::Letters`]: the 21 letters of the Italian alphabet.
pub const ALPHABET: [char; 21] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T',
    'U', 'V', 'Z',
];

/// How tiles are labelled.
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
pub enum TileMode {
    #[default]
    Numbers,
    Letters,
    Math,
}

/// Label for a single cell. The empty cell is labelled `""`.
///
/// `Math` mode draws from `rng`, so repeated calls may disagree; use
/// [`Labels`] to fix labels once per board.
pub fn label<R: Rng + ?Sized>(cell: Cell, mode: TileMode, rng: &mut R) -> String {
    let Some(id) = cell else {
        return String::new();
    };

    match mode {
        TileMode::Numbers => id.to_string(),
        TileMode::Letters => letter(id).to_string(),
        TileMode::Math => expression(id, rng),
    }
}

fn letter(id: TileId) -> char {
    ALPHABET[(id as usize + ALPHABET.len() - 1) % ALPHABET.len()]
}

/// A short arithmetic expression that evaluates to `id`.
fn expression<R: Rng + ?Sized>(id: TileId, rng: &mut R) -> String {
    let n = id as u32;
    match rng.gen_range(0..3) {
        0 if n >= 2 => {
            let a = rng.gen_range(1..n);
            format!("{}+{}", a, n - a)
        }
        0 => format!("{}+0", n),
        1 => {
            let s = rng.gen_range(1..=5);
            format!("{}-{}", n + s, s)
        }
        _ => match smallest_factor(n) {
            Some(f) => format!("{}x{}", f, n / f),
            None => format!("{}x1", n),
        },
    }
}

fn smallest_factor(n: u32) -> Option<u32> {
    (2..).take_while(|d| d * d <= n).find(|d| n % d == 0)
}

/// Labels fixed once for a board instance, indexed by tile identity.
///
/// Generated when a puzzle starts so a `Math` tile keeps the same expression
/// for the life of the puzzle instead of changing on every redraw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    mode: TileMode,
    by_id: Vec<String>,
}

impl Labels {
    /// Generate a label for every tile identity on `board`.
    pub fn generate<R: Rng + ?Sized>(board: &Board, mode: TileMode, rng: &mut R) -> Self {
        let count = board.size().cell_count();
        let by_id = (0..count)
            .map(|id| match id {
                0 => String::new(),
                id => label(Some(id as TileId), mode, rng),
            })
            .collect();
        Labels { mode, by_id }
    }

    pub fn mode(&self) -> TileMode {
        self.mode
    }

    /// Label for a cell. Empty and unknown identities give `""`.
    pub fn get(&self, cell: Cell) -> &str {
        cell.and_then(|id| self.by_id.get(id as usize))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Labels for every cell of `board`, in board order.
    pub fn for_board(&self, board: &Board) -> Vec<String> {
        board
            .cells()
            .iter()
            .map(|&cell| self.get(cell).to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::target_state;
    use crate::grid::GridSize;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn eval(expr: &str) -> u32 {
        let operands = |a: &str, b: &str| (a.parse::<u32>().unwrap(), b.parse::<u32>().unwrap());
        if let Some((a, b)) = expr.split_once('+') {
            let (a, b) = operands(a, b);
            a + b
        } else if let Some((a, b)) = expr.split_once('-') {
            let (a, b) = operands(a, b);
            a - b
        } else if let Some((a, b)) = expr.split_once('x') {
            let (a, b) = operands(a, b);
            a * b
        } else {
            panic!("not an expression: {expr}");
        }
    }

    #[test]
    fn test_numbers_mode() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(label(Some(1), TileMode::Numbers, &mut rng), "1");
        assert_eq!(label(Some(24), TileMode::Numbers, &mut rng), "24");
        assert_eq!(label(None, TileMode::Numbers, &mut rng), "");
    }

    #[test]
    fn test_letters_mode_wraps() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(label(Some(1), TileMode::Letters, &mut rng), "A");
        assert_eq!(label(Some(10), TileMode::Letters, &mut rng), "L");
        assert_eq!(label(Some(21), TileMode::Letters, &mut rng), "Z");
        assert_eq!(label(Some(22), TileMode::Letters, &mut rng), "A");
        assert_eq!(label(Some(24), TileMode::Letters, &mut rng), "C");
    }

    #[test]
    fn test_math_mode_evaluates_to_identity() {
        let mut rng = SmallRng::seed_from_u64(42);
        for id in 1..=255u16 {
            for _ in 0..8 {
                let expr = label(Some(id), TileMode::Math, &mut rng);
                assert_eq!(eval(&expr), id as u32, "{expr}");
            }
        }
    }

    #[test]
    fn test_math_fallbacks() {
        assert_eq!(smallest_factor(1), None);
        assert_eq!(smallest_factor(7), None);
        assert_eq!(smallest_factor(9), Some(3));
        assert_eq!(smallest_factor(12), Some(2));
    }

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("math".parse::<TileMode>().unwrap(), TileMode::Math);
        assert_eq!("LETTERS".parse::<TileMode>().unwrap(), TileMode::Letters);
        assert_eq!(TileMode::Numbers.to_string(), "numbers");
    }

    #[test]
    fn test_labels_are_stable_per_board() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut board = target_state(GridSize::new(4).unwrap());
        let labels = Labels::generate(&board, TileMode::Math, &mut rng);

        let before = labels.get(Some(9)).to_string();
        board.slide(3);
        assert_eq!(labels.get(Some(9)), before);
        assert_eq!(labels.get(None), "");
        assert_eq!(labels.get(Some(99)), "");

        let shown = labels.for_board(&board);
        assert_eq!(shown.len(), 16);
        assert_eq!(shown[board.empty_index()], "");
        for (cell, text) in board.cells().iter().zip(&shown) {
            if let Some(id) = cell {
                assert_eq!(eval(text), *id as u32);
            }
        }
    }
}

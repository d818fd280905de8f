//! Move resolution: turning a requested cell into the run of tiles that slide.

use crate::grid::{to_row_col, GridSize};

/// An ordered run of cells that slide toward the empty cell as one action.
///
/// Cells are listed nearest-to-empty first. Swapping each in turn with the
/// advancing empty cell moves the requested tile's row/column segment one step
/// toward the original hole and leaves the hole at [`MoveSequence::target`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSequence {
    size: GridSize,
    origin: usize,
    cells: Vec<usize>,
}

impl MoveSequence {
    /// Grid the sequence was resolved against.
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Empty cell before the slide.
    pub fn origin(&self) -> usize {
        self.origin
    }

    /// Requested cell; the empty cell ends up here.
    pub fn target(&self) -> usize {
        // resolve never builds an empty sequence
        self.cells[self.cells.len() - 1]
    }

    /// Cells in swap order.
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    /// Number of tiles shifted.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The slide that puts every tile back where it was.
    pub fn inverse(&self) -> MoveSequence {
        line_walk(self.origin, self.target(), self.size)
    }
}

impl<'a> IntoIterator for &'a MoveSequence {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// Resolve a request to slide the tile at `target` toward the empty cell.
///
/// Returns `None` when either index is off the grid, when `target` is the
/// empty cell itself, or when the two share neither a row nor a column.
/// Otherwise the sequence walks from the cell next to `empty` up to and
/// including `target`.
pub fn resolve(target: usize, empty: usize, size: GridSize) -> Option<MoveSequence> {
    let (target_row, target_col) = to_row_col(target, size)?;
    let (empty_row, empty_col) = to_row_col(empty, size)?;

    if target == empty || (target_row != empty_row && target_col != empty_col) {
        return None;
    }

    Some(line_walk(target, empty, size))
}

/// Walk from `empty` to `target` along their shared row or column.
///
/// Both indices must be on the grid, distinct and aligned.
fn line_walk(target: usize, empty: usize, size: GridSize) -> MoveSequence {
    let stride = if target / size.get() == empty / size.get() {
        1
    } else {
        size.get()
    };

    let mut cells = Vec::with_capacity(target.abs_diff(empty) / stride);
    let mut current = empty;
    while current != target {
        current = if target > empty {
            current + stride
        } else {
            current - stride
        };
        cells.push(current);
    }

    MoveSequence {
        size,
        origin: empty,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> GridSize {
        GridSize::new(n).unwrap()
    }

    #[test]
    fn test_resolve_same_row_multi_tile() {
        let seq = resolve(6, 8, size(3)).unwrap();
        assert_eq!(seq.cells(), &[7, 6]);
        assert_eq!(seq.origin(), 8);
        assert_eq!(seq.target(), 6);
    }

    #[test]
    fn test_resolve_same_column_multi_tile() {
        let seq = resolve(2, 14, size(4)).unwrap();
        assert_eq!(seq.cells(), &[10, 6, 2]);
    }

    #[test]
    fn test_resolve_toward_higher_indices() {
        let seq = resolve(3, 0, size(4)).unwrap();
        assert_eq!(seq.cells(), &[1, 2, 3]);
        let seq = resolve(20, 0, size(5)).unwrap();
        assert_eq!(seq.cells(), &[5, 10, 15, 20]);
    }

    #[test]
    fn test_resolve_adjacent_single_tile() {
        let seq = resolve(5, 8, size(3)).unwrap();
        assert_eq!(seq.cells(), &[5]);
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn test_resolve_rejects_diagonal() {
        assert_eq!(resolve(4, 0, size(3)), None);
        assert_eq!(resolve(5, 0, size(3)), None);
    }

    #[test]
    fn test_resolve_rejects_self_and_out_of_range() {
        assert_eq!(resolve(4, 4, size(3)), None);
        assert_eq!(resolve(9, 8, size(3)), None);
        assert_eq!(resolve(0, 9, size(3)), None);
    }

    #[test]
    fn test_resolve_length_is_manhattan_offset() {
        let n = size(5);
        for empty in 0..n.cell_count() {
            for target in 0..n.cell_count() {
                let (er, ec) = to_row_col(empty, n).unwrap();
                let (tr, tc) = to_row_col(target, n).unwrap();
                match resolve(target, empty, n) {
                    Some(seq) => {
                        assert!(er == tr || ec == tc);
                        assert_eq!(seq.len(), er.abs_diff(tr) + ec.abs_diff(tc));
                        assert_eq!(seq.target(), target);
                    }
                    None => assert!(target == empty || (er != tr && ec != tc)),
                }
            }
        }
    }

    #[test]
    fn test_inverse_walks_back() {
        let seq = resolve(6, 8, size(3)).unwrap();
        let inverse = seq.inverse();
        assert_eq!(inverse.origin(), 6);
        assert_eq!(inverse.cells(), &[7, 8]);
        assert_eq!(inverse.inverse(), seq);
    }
}

//! Test fixtures for Gantry development.
//!
//! The main fixture is [`grid_from_rows`], which builds a [`Grid`] from an
//! ASCII picture — `#` for shelving, `.` (or anything else) for free floor:
//!
//! ```
//! use gantry_test_utils::grid_from_rows;
//!
//! let grid = grid_from_rows(&[
//!     ".....",
//!     ".###.",
//!     ".....",
//! ]);
//! assert_eq!(grid.rows(), 3);
//! assert!(grid.is_blocked(gantry_core::Cell::new(1, 2)));
//! ```

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use gantry_core::{Cell, CellSet};
use gantry_grid::Grid;

/// Shorthand cell constructor for test bodies.
pub fn cell(row: i32, col: i32) -> Cell {
    Cell::new(row, col)
}

/// Build a [`CellSet`] from `(row, col)` pairs, preserving order.
pub fn cells(pairs: &[(i32, i32)]) -> CellSet {
    pairs.iter().map(|&(r, c)| Cell::new(r, c)).collect()
}

/// Build a grid from an ASCII picture, one string per row.
///
/// `#` marks a static obstacle; every other character is free floor.
/// Panics on empty or ragged input — fixtures are hand-written, so a
/// malformed picture is a bug in the test.
pub fn grid_from_rows(rows: &[&str]) -> Grid {
    assert!(!rows.is_empty(), "grid picture has no rows");
    let cols = rows[0].len();
    assert!(cols > 0, "grid picture has no columns");
    let mut grid = Grid::new(rows.len() as u32, cols as u32)
        .expect("picture dimensions fit in a grid");
    for (r, line) in rows.iter().enumerate() {
        assert_eq!(line.len(), cols, "ragged grid picture at row {r}");
        for (c, ch) in line.chars().enumerate() {
            if ch == '#' {
                grid.add_obstacle(Cell::new(r as i32, c as i32));
            }
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picture_round_trips() {
        let grid = grid_from_rows(&["..#", "...", "#.."]);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert!(grid.is_blocked(cell(0, 2)));
        assert!(grid.is_blocked(cell(2, 0)));
        assert!(!grid.is_blocked(cell(1, 1)));
        assert_eq!(grid.obstacles().len(), 2);
    }

    #[test]
    #[should_panic(expected = "ragged")]
    fn ragged_picture_panics() {
        grid_from_rows(&["..", "..."]);
    }

    #[test]
    fn cells_preserves_order() {
        let set = cells(&[(1, 1), (0, 0)]);
        let order: Vec<Cell> = set.iter().copied().collect();
        assert_eq!(order, vec![cell(1, 1), cell(0, 0)]);
    }
}

//! The bounded warehouse floor grid.

use crate::error::GridError;
use gantry_core::{Cell, CellSet};
use smallvec::SmallVec;

/// A 2D warehouse floor with 4-connected movement.
///
/// Each cell has coordinate `(row, col)` where `0 <= row < rows` and
/// `0 <= col < cols`. Robots move in the four cardinal directions only —
/// no diagonals. A cell is either free floor or a static obstacle
/// (shelving, clutter); the static set is fixed once setup finishes.
///
/// # Examples
///
/// ```
/// use gantry_core::Cell;
/// use gantry_grid::Grid;
///
/// let mut grid = Grid::new(5, 5).unwrap();
/// grid.add_obstacle(Cell::new(2, 2));
///
/// assert!(grid.is_valid(Cell::new(0, 0)));
/// assert!(!grid.is_valid(Cell::new(5, 0)));
/// assert!(grid.is_blocked(Cell::new(2, 2)));
/// assert_eq!(grid.neighbours(Cell::new(0, 0)).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: u32,
    cols: u32,
    blocked: CellSet,
}

impl Grid {
    /// Maximum dimension size: coordinates use `i32`, so each axis must fit.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Create an empty grid with `rows * cols` free cells.
    ///
    /// Returns `Err(GridError::EmptyGrid)` if either dimension is 0, or
    /// `Err(GridError::DimensionTooLarge)` if either exceeds `i32::MAX`.
    pub fn new(rows: u32, cols: u32) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyGrid);
        }
        if rows > Self::MAX_DIM {
            return Err(GridError::DimensionTooLarge {
                name: "rows",
                value: rows,
                max: Self::MAX_DIM,
            });
        }
        if cols > Self::MAX_DIM {
            return Err(GridError::DimensionTooLarge {
                name: "cols",
                value: cols,
                max: Self::MAX_DIM,
            });
        }
        Ok(Self {
            rows,
            cols,
            blocked: CellSet::new(),
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Total number of cells, free or blocked.
    pub fn cell_count(&self) -> usize {
        (self.rows as usize) * (self.cols as usize)
    }

    /// Whether `cell` lies within the grid boundary.
    pub fn is_valid(&self, cell: Cell) -> bool {
        cell.row >= 0
            && cell.row < self.rows as i32
            && cell.col >= 0
            && cell.col < self.cols as i32
    }

    /// Whether `cell` is a static obstacle.
    ///
    /// Out-of-bounds cells are not in the set; callers gate on
    /// [`is_valid`](Grid::is_valid) first.
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.blocked.contains(&cell)
    }

    /// Whether `cell` is inside the grid and free of static obstacles.
    pub fn is_free(&self, cell: Cell) -> bool {
        self.is_valid(cell) && !self.is_blocked(cell)
    }

    /// Add a permanent obstacle. Idempotent; there is no removal — shelf
    /// layout is fixed for a simulation run.
    pub fn add_obstacle(&mut self, cell: Cell) {
        self.blocked.insert(cell);
    }

    /// The static obstacle set, in insertion order.
    pub fn obstacles(&self) -> &CellSet {
        &self.blocked
    }

    /// In-bounds 4-connected neighbours of `cell` (N/S/E/W).
    ///
    /// Blocked neighbours are included — occupancy filtering is the
    /// planner's job, topology is the grid's.
    pub fn neighbours(&self, cell: Cell) -> SmallVec<[Cell; 4]> {
        let offsets: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
        let mut result = SmallVec::new();
        for (dr, dc) in offsets {
            let n = cell.offset(dr, dc);
            if self.is_valid(n) {
                result.push(n);
            }
        }
        result
    }

    /// Flat row-major index of an in-bounds cell.
    pub fn flat_index(&self, cell: Cell) -> usize {
        (cell.row as usize) * (self.cols as usize) + (cell.col as usize)
    }

    /// The cell at a flat row-major index.
    pub fn cell_at(&self, index: usize) -> Cell {
        Cell::new(
            (index / self.cols as usize) as i32,
            (index % self.cols as usize) as i32,
        )
    }
}

//! Seeded warehouse layout generation.
//!
//! Builds a [`Grid`] from two ingredients: regular shelving rows with
//! aisle gaps, and uniform random clutter at a configured density. The
//! RNG is a seeded ChaCha8, so the same parameters and seed always
//! produce the same floor.

use crate::error::GridError;
use crate::grid::Grid;
use gantry_core::Cell;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Parameters shaping a generated warehouse floor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
    /// Vertical spacing between shelving rows; `0` disables shelving.
    ///
    /// Shelf rows start at row 2, keeping the depot row and one approach
    /// row clear, and never occupy the last row.
    pub shelf_row_spacing: u32,
    /// Every n-th column of a shelf row is left open as an aisle gap;
    /// `0` produces solid (impassable) shelf rows.
    pub shelf_gap_spacing: u32,
    /// Probability that any remaining free cell becomes clutter.
    pub clutter_density: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            shelf_row_spacing: 3,
            shelf_gap_spacing: 5,
            clutter_density: 0.05,
        }
    }
}

impl LayoutParams {
    /// A completely open floor: no shelving, no clutter.
    pub fn open() -> Self {
        Self {
            shelf_row_spacing: 0,
            shelf_gap_spacing: 0,
            clutter_density: 0.0,
        }
    }
}

/// Generate a warehouse floor.
///
/// Cells listed in `keep_clear` (robot homes) are never blocked. Clutter
/// is sampled row-major from a ChaCha8 RNG seeded with `seed`; identical
/// inputs produce identical floors.
///
/// Returns `Err(GridError::InvalidDensity)` when `clutter_density` is not
/// a probability, or the underlying construction error for bad dimensions.
pub fn generate(
    rows: u32,
    cols: u32,
    params: &LayoutParams,
    keep_clear: &[Cell],
    seed: u64,
) -> Result<Grid, GridError> {
    if !(0.0..=1.0).contains(&params.clutter_density) {
        return Err(GridError::InvalidDensity {
            value: params.clutter_density,
        });
    }
    let mut grid = Grid::new(rows, cols)?;

    if params.shelf_row_spacing > 0 {
        let mut r = 2i32;
        while r < rows as i32 - 1 {
            for c in 0..cols as i32 {
                let is_gap = params.shelf_gap_spacing > 0
                    && (c as u32) % params.shelf_gap_spacing == params.shelf_gap_spacing - 1;
                let cell = Cell::new(r, c);
                if !is_gap && !keep_clear.contains(&cell) {
                    grid.add_obstacle(cell);
                }
            }
            r += params.shelf_row_spacing as i32;
        }
    }

    if params.clutter_density > 0.0 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for r in 0..rows as i32 {
            for c in 0..cols as i32 {
                let cell = Cell::new(r, c);
                if grid.is_blocked(cell) || keep_clear.contains(&cell) {
                    continue;
                }
                if rng.random_bool(params.clutter_density) {
                    grid.add_obstacle(cell);
                }
            }
        }
    }

    Ok(grid)
}

//! Dynamic-obstacle lifecycle.
//!
//! Transient blockages — a dropped pallet, a person in an aisle — appear
//! and disappear probabilistically each tick, distinct from the static
//! shelving. The stream is a seeded ChaCha8 RNG, so a given seed always
//! produces the same obstacle timeline.

use gantry_core::{Cell, CellSet};
use gantry_grid::Grid;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// The coordinator-owned set of transient blocked cells.
#[derive(Debug, Clone)]
pub struct DynamicObstacles {
    cells: CellSet,
    rng: ChaCha8Rng,
    spawn_probability: f64,
    despawn_probability: f64,
}

impl DynamicObstacles {
    /// Create an empty set with its own seeded stream.
    ///
    /// Probabilities are validated by the fleet configuration before
    /// this is constructed.
    pub fn new(seed: u64, spawn_probability: f64, despawn_probability: f64) -> Self {
        Self {
            cells: CellSet::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            spawn_probability,
            despawn_probability,
        }
    }

    /// The current obstacle cells, in insertion order.
    pub fn cells(&self) -> &CellSet {
        &self.cells
    }

    /// Run one environment step: despawn, then maybe spawn.
    ///
    /// Each existing obstacle vanishes with `despawn_probability`; then,
    /// with `spawn_probability`, one uniformly random cell is drawn and
    /// inserted if it is neither statically blocked nor in `occupied`
    /// (robot positions — an obstacle never materializes under a robot).
    /// Returns `(spawned, despawned)` counts for metrics.
    pub fn update(&mut self, grid: &Grid, occupied: &CellSet) -> (u32, u32) {
        let mut despawned = 0;
        if self.despawn_probability > 0.0 {
            let rng = &mut self.rng;
            let p = self.despawn_probability;
            self.cells.retain(|_| {
                if rng.random_bool(p) {
                    despawned += 1;
                    false
                } else {
                    true
                }
            });
        }

        let mut spawned = 0;
        if self.spawn_probability > 0.0 && self.rng.random_bool(self.spawn_probability) {
            let row = self.rng.random_range(0..grid.rows() as i32);
            let col = self.rng.random_range(0..grid.cols() as i32);
            let cell = Cell::new(row, col);
            if !grid.is_blocked(cell) && !occupied.contains(&cell) && self.cells.insert(cell) {
                spawned = 1;
            }
        }
        (spawned, despawned)
    }

    /// Insert an obstacle directly, bypassing the stochastic stream.
    ///
    /// For scripted scenarios and tests; idempotent.
    pub fn insert(&mut self, cell: Cell) {
        self.cells.insert(cell);
    }
}

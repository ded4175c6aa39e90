//! Shared fixtures for Gantry benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]

use gantry_core::Cell;
use gantry_engine::{Coordinator, FleetConfig};
use gantry_grid::layout::{generate, LayoutParams};
use gantry_grid::Grid;

/// A cluttered square floor for path-search benchmarks. Cells in
/// `keep_clear` (the endpoints under test) stay free.
pub fn cluttered_grid(size: u32, density: f64, seed: u64, keep_clear: &[Cell]) -> Grid {
    let params = LayoutParams {
        shelf_row_spacing: 0,
        shelf_gap_spacing: 0,
        clutter_density: density,
    };
    generate(size, size, &params, keep_clear, seed).expect("bench grid")
}

/// A shelved warehouse with `robots` depots along the top row.
pub fn warehouse_coordinator(size: u32, robots: u32, seed: u64) -> Coordinator {
    let homes: Vec<Cell> = (0..robots).map(|i| Cell::new(0, i as i32 * 2)).collect();
    let params = LayoutParams {
        shelf_row_spacing: 3,
        shelf_gap_spacing: 5,
        clutter_density: 0.02,
    };
    let grid = generate(size, size, &params, &homes, seed).expect("bench grid");
    let config = FleetConfig {
        grid,
        homes,
        pace: 1,
        scan_range: 3,
        spawn_probability: 0.1,
        despawn_probability: 0.15,
        seed,
        tick_interval: None,
    };
    Coordinator::new(config).expect("bench coordinator")
}

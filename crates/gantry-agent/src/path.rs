//! Uniform-cost path search over the warehouse grid.

use gantry_core::{Cell, CellSet};
use gantry_grid::Grid;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A frontier entry: accumulated cost, insertion sequence, flat cell
/// index, and the settled predecessor it was reached from.
struct Frontier {
    cost: u32,
    seq: u64,
    index: usize,
    parent: Option<usize>,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.seq == other.seq
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    // BinaryHeap is a max-heap; invert so the cheapest entry pops first,
    // with ties resolved in insertion order (earlier seq wins).
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Shortest 4-connected route from `start` to `goal`, inclusive of both.
///
/// Uniform-cost search with unit edge weights. A successor cell is
/// expanded iff it is in bounds, not statically blocked, and not in
/// `blocked` (the caller's reservation/hazard set). Equal-cost
/// alternatives are resolved by queue insertion order — callers must not
/// assume a unique shortest path among same-length routes.
///
/// Returns the empty vector when either endpoint is blocked or no route
/// exists. That is a normal "no path right now" outcome, interpreted by
/// callers as "replan later" — never an error.
pub fn find_path(grid: &Grid, start: Cell, goal: Cell, blocked: &CellSet) -> Vec<Cell> {
    if !grid.is_valid(start) || !grid.is_valid(goal) {
        return Vec::new();
    }
    if grid.is_blocked(start) || blocked.contains(&start) {
        return Vec::new();
    }
    if grid.is_blocked(goal) || blocked.contains(&goal) {
        return Vec::new();
    }

    let n = grid.cell_count();
    let mut settled = vec![false; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;

    let start_index = grid.flat_index(start);
    let goal_index = grid.flat_index(goal);
    heap.push(Frontier {
        cost: 0,
        seq,
        index: start_index,
        parent: None,
    });

    while let Some(entry) = heap.pop() {
        if settled[entry.index] {
            continue;
        }
        settled[entry.index] = true;
        parent[entry.index] = entry.parent;

        if entry.index == goal_index {
            let mut route = Vec::with_capacity(entry.cost as usize + 1);
            let mut cursor = Some(goal_index);
            while let Some(index) = cursor {
                route.push(grid.cell_at(index));
                cursor = parent[index];
            }
            route.reverse();
            return route;
        }

        for nb in grid.neighbours(grid.cell_at(entry.index)) {
            if grid.is_blocked(nb) || blocked.contains(&nb) {
                continue;
            }
            let index = grid.flat_index(nb);
            if settled[index] {
                continue;
            }
            seq += 1;
            heap.push(Frontier {
                cost: entry.cost + 1,
                seq,
                index,
                parent: Some(entry.index),
            });
        }
    }

    Vec::new()
}

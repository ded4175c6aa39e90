//! Gantry: a warehouse robot fleet simulation.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Gantry sub-crates. For most users, adding `gantry` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use gantry::prelude::*;
//! use gantry::grid::layout::{generate, LayoutParams};
//!
//! // A 10×12 floor with shelving rows, two depots in the top-left
//! // corner.
//! let homes = vec![Cell::new(0, 0), Cell::new(0, 1)];
//! let params = LayoutParams {
//!     shelf_row_spacing: 3,
//!     shelf_gap_spacing: 5,
//!     clutter_density: 0.0,
//! };
//! let grid = generate(10, 12, &params, &homes, 42).unwrap();
//!
//! let config = FleetConfig {
//!     grid,
//!     homes,
//!     pace: 1,
//!     scan_range: 2,
//!     spawn_probability: 0.05,
//!     despawn_probability: 0.1,
//!     seed: 42,
//!     tick_interval: None,
//! };
//! let mut fleet = Coordinator::new(config).unwrap();
//!
//! // Queue a job and run the simulation forward.
//! fleet.add_task(Cell::new(1, 5), Cell::new(7, 3)).unwrap();
//! for _ in 0..50 {
//!     fleet.tick();
//! }
//! let snapshot = fleet.snapshot();
//! assert_eq!(snapshot.agents.len(), 2);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `gantry-core` | Cells, ids, tasks, robot states |
//! | [`grid`] | `gantry-grid` | The floor grid and layout generation |
//! | [`agent`] | `gantry-agent` | Pathfinding and the robot state machine |
//! | [`engine`] | `gantry-engine` | The coordinator, config, snapshots, runner |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and ids (`gantry-core`).
///
/// Cells, cell sets, strongly-typed ids, tasks, robot states, and the
/// task-rejection error.
pub use gantry_core as types;

/// The warehouse floor (`gantry-grid`).
///
/// [`grid::Grid`] plus the seeded [`grid::layout`] generator.
pub use gantry_grid as grid;

/// Per-robot planning and motion (`gantry-agent`).
///
/// [`agent::find_path`] uniform-cost search and the [`agent::Robot`]
/// state machine.
pub use gantry_agent as agent;

/// The coordination engine (`gantry-engine`).
///
/// [`engine::Coordinator`] for synchronous stepping,
/// [`engine::RealtimeFleet`] for autonomous background ticking.
pub use gantry_engine as engine;

/// Common imports for typical Gantry usage.
///
/// ```rust
/// use gantry::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use gantry_core::{
        AgentId, AgentState, Assignment, Cell, CellSet, Task, TaskId, TaskRejection, TaskStatus,
        TickId,
    };

    // Grid
    pub use gantry_grid::{Grid, GridError, LayoutParams};

    // Agent
    pub use gantry_agent::{find_path, Arrival, Robot};

    // Engine
    pub use gantry_engine::{
        AgentSnapshot, ConfigError, Coordinator, FleetConfig, FleetSnapshot, RealtimeFleet,
        RunnerError, TaskSnapshot, TickMetrics,
    };
}

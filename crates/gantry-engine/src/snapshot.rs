//! Read-only state views for presentation layers.
//!
//! Snapshots are plain owned values: the dashboard serializes them, the
//! tests assert on them, and neither can reach back into live engine
//! state.

use gantry_core::{AgentId, AgentState, Cell, TaskId, TaskStatus, TickId};

/// One robot's externally visible state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentSnapshot {
    /// Robot id.
    pub id: AgentId,
    /// Current cell.
    pub pos: Cell,
    /// State machine position.
    pub state: AgentState,
    /// The cell it will step into next, if it has a plan.
    pub next_pos: Option<Cell>,
}

/// One live task's externally visible state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskSnapshot {
    /// Task id.
    pub id: TaskId,
    /// Pickup cell.
    pub pickup: Cell,
    /// Drop cell.
    pub drop: Cell,
    /// Lifecycle state.
    pub status: TaskStatus,
}

/// A full owned view of the simulation at one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct FleetSnapshot {
    /// The tick this snapshot describes.
    pub tick: TickId,
    /// Whether the shift-end recall is in progress.
    pub shift_ending: bool,
    /// All robots, in id order.
    pub agents: Vec<AgentSnapshot>,
    /// All live (pending or assigned) tasks, in id order.
    pub tasks: Vec<TaskSnapshot>,
    /// The static obstacle set.
    pub static_obstacles: Vec<Cell>,
    /// The dynamic obstacle set at this tick.
    pub dynamic_obstacles: Vec<Cell>,
}

//! The fleet coordination engine.
//!
//! [`Coordinator`] owns the grid, the robots, and the task list, and runs
//! the per-tick orchestration: dynamic-obstacle lifecycle, reactive
//! replanning, task assignment or shift-end recall, paced movement, and
//! task reaping. [`RealtimeFleet`] moves a coordinator onto a background
//! tick thread behind a command channel for presentation layers that
//! poll rather than step.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod coordinator;
pub mod metrics;
pub mod obstacles;
pub mod runner;
pub mod snapshot;

pub use config::{ConfigError, FleetConfig};
pub use coordinator::Coordinator;
pub use metrics::TickMetrics;
pub use obstacles::DynamicObstacles;
pub use runner::{RealtimeFleet, RunnerError};
pub use snapshot::{AgentSnapshot, FleetSnapshot, TaskSnapshot};

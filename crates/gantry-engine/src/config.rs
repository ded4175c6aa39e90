//! Fleet configuration, validation, and error types.
//!
//! [`FleetConfig`] is the single construction input for a simulation:
//! the warehouse floor (built up front, typically via
//! [`gantry_grid::layout::generate`]), robot homes, and the timing and
//! probability constants. Validation is fail-fast: a malformed
//! configuration is the one condition the engine refuses to start from.

use gantry_core::Cell;
use gantry_grid::{Grid, GridError};
use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Construction-time configuration for a fleet.
///
/// The grid is constructed by the caller and moved in — generated from
/// [`LayoutParams`](gantry_grid::LayoutParams) for production floors,
/// hand-built for tests and custom layouts.
#[derive(Clone, Debug)]
pub struct FleetConfig {
    /// The warehouse floor, shelving already in place.
    pub grid: Grid,
    /// One home (depot) cell per robot; robot n gets id n and starts at
    /// `homes[n]`. Homes must be distinct, in bounds, and free.
    pub homes: Vec<Cell>,
    /// Ticks between physical cell advances; 1 = move every tick.
    pub pace: u32,
    /// Sensor horizon: how many planned cells ahead each robot scans.
    pub scan_range: usize,
    /// Per-tick probability that a new dynamic obstacle appears.
    pub spawn_probability: f64,
    /// Per-tick probability that each existing dynamic obstacle vanishes.
    pub despawn_probability: f64,
    /// Seed for the dynamic-obstacle stream. Identical configurations
    /// produce identical simulations.
    pub seed: u64,
    /// Tick cadence for [`RealtimeFleet`](crate::runner::RealtimeFleet);
    /// `None` means ticks only happen on explicit `step` commands.
    pub tick_interval: Option<Duration>,
}

impl FleetConfig {
    /// Check the structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.homes.is_empty() {
            return Err(ConfigError::NoRobots);
        }
        for (i, home) in self.homes.iter().enumerate() {
            if !self.grid.is_valid(*home) {
                return Err(ConfigError::HomeOutOfBounds { home: *home });
            }
            if self.grid.is_blocked(*home) {
                return Err(ConfigError::HomeBlocked { home: *home });
            }
            if self.homes[..i].contains(home) {
                return Err(ConfigError::DuplicateHome { home: *home });
            }
        }
        if self.pace == 0 {
            return Err(ConfigError::ZeroPace);
        }
        if self.scan_range == 0 {
            return Err(ConfigError::ZeroScanRange);
        }
        for (name, value) in [
            ("spawn_probability", self.spawn_probability),
            ("despawn_probability", self.despawn_probability),
        ] {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }
        Ok(())
    }
}

/// Errors detected while building a fleet from a [`FleetConfig`].
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Grid or layout construction failed.
    Grid(GridError),
    /// No robot homes were configured.
    NoRobots,
    /// A home cell lies outside the grid.
    HomeOutOfBounds {
        /// The offending home cell.
        home: Cell,
    },
    /// A home cell sits on a static obstacle.
    HomeBlocked {
        /// The offending home cell.
        home: Cell,
    },
    /// Two robots share the same home cell.
    DuplicateHome {
        /// The shared cell.
        home: Cell,
    },
    /// `pace` must be at least 1.
    ZeroPace,
    /// `scan_range` must be at least 1.
    ZeroScanRange,
    /// A probability is outside `[0, 1]`.
    InvalidProbability {
        /// Which probability was invalid.
        name: &'static str,
        /// The offending value.
        value: f64,
    },
    /// The background tick thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of the failure.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::NoRobots => write!(f, "at least one robot home is required"),
            Self::HomeOutOfBounds { home } => {
                write!(f, "robot home {home} is outside the grid")
            }
            Self::HomeBlocked { home } => {
                write!(f, "robot home {home} is on a static obstacle")
            }
            Self::DuplicateHome { home } => {
                write!(f, "robot home {home} is used twice")
            }
            Self::ZeroPace => write!(f, "pace must be at least 1"),
            Self::ZeroScanRange => write!(f, "scan_range must be at least 1"),
            Self::InvalidProbability { name, value } => {
                write!(f, "{name} must be within [0, 1], got {value}")
            }
            Self::ThreadSpawnFailed { reason } => {
                write!(f, "tick thread spawn failed: {reason}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

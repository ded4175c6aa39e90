//! Error types shared across the Gantry workspace.

use crate::cell::Cell;
use std::error::Error;
use std::fmt;

/// Why a task-creation request was refused.
///
/// Rejection is reported to the caller and leaves the simulation
/// untouched; it is the only error surface of the task-intake path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskRejection {
    /// The fleet is being recalled; no new work is accepted.
    ShiftEnding,
    /// An endpoint lies outside the grid.
    OutOfBounds {
        /// The offending endpoint.
        cell: Cell,
    },
    /// An endpoint sits on a static obstacle.
    Blocked {
        /// The offending endpoint.
        cell: Cell,
    },
}

impl fmt::Display for TaskRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShiftEnding => write!(f, "shift end in progress, task refused"),
            Self::OutOfBounds { cell } => {
                write!(f, "task endpoint {cell} is outside the grid")
            }
            Self::Blocked { cell } => {
                write!(f, "task endpoint {cell} is on a static obstacle")
            }
        }
    }
}

impl Error for TaskRejection {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_cell() {
        let e = TaskRejection::Blocked {
            cell: Cell::new(2, 3),
        };
        assert!(e.to_string().contains("(2, 3)"));
    }
}

//! Tasks and the assignment handed to a robot.

use crate::cell::Cell;
use crate::id::TaskId;

/// Lifecycle state of a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    /// Waiting for a feasible idle robot.
    Pending,
    /// Bound to a robot that has committed a path.
    Assigned,
    /// The load was delivered to the drop cell.
    Completed,
    /// Withdrawn by the shift-end protocol; never completes.
    Cancelled,
}

/// A pickup-and-drop job, owned by the coordinator's task list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Task {
    /// Unique, monotonically increasing id.
    pub id: TaskId,
    /// Where the load unit is collected.
    pub pickup: Cell,
    /// Where the load unit is delivered.
    pub drop: Cell,
    /// Current lifecycle state.
    pub status: TaskStatus,
}

impl Task {
    /// Create a new pending task.
    pub fn new(id: TaskId, pickup: Cell, drop: Cell) -> Self {
        Self {
            id,
            pickup,
            drop,
            status: TaskStatus::Pending,
        }
    }

    /// The assignment copy a robot carries while working this task.
    pub fn assignment(&self) -> Assignment {
        Assignment {
            task: self.id,
            pickup: self.pickup,
            drop: self.drop,
        }
    }
}

/// The slice of a task a robot needs while executing it.
///
/// A plain-value copy, not a reference: the task itself stays owned by
/// the coordinator, and at most one robot carries an assignment for any
/// given task id at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assignment {
    /// Id of the owning task.
    pub task: TaskId,
    /// Pickup cell.
    pub pickup: Cell,
    /// Drop cell.
    pub drop: Cell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_is_pending() {
        let t = Task::new(TaskId(0), Cell::new(0, 4), Cell::new(4, 4));
        assert_eq!(t.status, TaskStatus::Pending);
    }

    #[test]
    fn assignment_copies_endpoints() {
        let t = Task::new(TaskId(3), Cell::new(1, 2), Cell::new(3, 4));
        let a = t.assignment();
        assert_eq!(a.task, TaskId(3));
        assert_eq!(a.pickup, Cell::new(1, 2));
        assert_eq!(a.drop, Cell::new(3, 4));
    }
}

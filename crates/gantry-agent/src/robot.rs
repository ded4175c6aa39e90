//! The per-robot state machine.

use crate::path::find_path;
use gantry_core::{AgentId, AgentState, Assignment, Cell, CellSet, TaskId};
use gantry_grid::Grid;
use std::collections::VecDeque;

/// What a call to [`Robot::advance`] reached, if anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arrival {
    /// The robot stepped onto its assignment's pickup cell.
    PickedUp,
    /// The load was delivered; the named task is complete.
    Delivered(TaskId),
    /// The robot reached its home cell after a recall.
    Home,
}

/// A single warehouse robot: position, planned path, and state machine.
///
/// A robot owns its planned path exclusively — the coordinator reads it
/// for reservation snapshots but never mutates it. All planning goes
/// through [`plan_for_task`](Robot::plan_for_task),
/// [`plan_return`](Robot::plan_return), and the reactive
/// [`scan_and_react`](Robot::scan_and_react); all motion through
/// [`advance`](Robot::advance).
///
/// The hazard memory holds dynamic-obstacle cells this robot has
/// personally observed. It is standing for the duration of a task cycle
/// (reactive replans keep avoiding remembered hazards) and cleared when a
/// fresh plan cycle starts, so stale hazards cannot block the robot
/// forever.
#[derive(Debug, Clone)]
pub struct Robot {
    id: AgentId,
    home: Cell,
    pos: Cell,
    path: VecDeque<Cell>,
    assignment: Option<Assignment>,
    state: AgentState,
    pace: u32,
    pace_counter: u32,
    scan_range: usize,
    hazards: CellSet,
}

impl Robot {
    /// Create an idle robot parked at `home`.
    ///
    /// `pace` is the number of ticks between physical cell advances
    /// (1 = move every tick); `scan_range` is the sensor horizon in
    /// cells. Both are validated by the fleet configuration before any
    /// robot is built.
    pub fn new(id: AgentId, home: Cell, pace: u32, scan_range: usize) -> Self {
        debug_assert!(pace >= 1, "pace must be at least 1");
        Self {
            id,
            home,
            pos: home,
            path: VecDeque::new(),
            assignment: None,
            state: AgentState::Idle,
            pace,
            pace_counter: 0,
            scan_range,
            hazards: CellSet::new(),
        }
    }

    /// This robot's id.
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// The depot cell this robot starts at and is recalled to.
    pub fn home(&self) -> Cell {
        self.home
    }

    /// Current position.
    pub fn pos(&self) -> Cell {
        self.pos
    }

    /// Current state.
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Id of the task this robot is working, if any.
    pub fn current_task(&self) -> Option<TaskId> {
        self.assignment.map(|a| a.task)
    }

    /// The cell this robot will step into next, if it has a plan.
    pub fn next_pos(&self) -> Option<Cell> {
        self.path.front().copied()
    }

    /// Remaining planned route, in travel order.
    pub fn planned_path(&self) -> impl Iterator<Item = Cell> + '_ {
        self.path.iter().copied()
    }

    /// Number of cells left on the planned route.
    pub fn path_len(&self) -> usize {
        self.path.len()
    }

    /// Whether the robot is standing on its home cell.
    pub fn is_at_home(&self) -> bool {
        self.pos == self.home
    }

    /// Hazard cells this robot has observed during the current plan cycle.
    pub fn hazards(&self) -> &CellSet {
        &self.hazards
    }

    // ── Planning ────────────────────────────────────────────────

    /// Plan both legs of a task and commit to it.
    ///
    /// Leg 1 runs from the current position to the pickup against
    /// `blocked`; leg 2 from pickup to drop against `blocked` plus leg
    /// 1's cells (excluding the pickup itself, which must stay enterable
    /// as leg 2's start). On success the two legs are spliced into the
    /// planned path, the assignment is bound, and the state becomes
    /// `MovingToPickup` (`MovingToDrop` when already standing on the
    /// pickup). Starts a fresh plan cycle: hazard memory is cleared.
    ///
    /// Returns `false`, leaving all state untouched, when either leg has
    /// no route — the coordinator's signal to keep the task pending.
    pub fn plan_for_task(&mut self, grid: &Grid, assignment: Assignment, blocked: &CellSet) -> bool {
        self.hazards.clear();
        let Some(planned) = plan_task_route(grid, self.pos, assignment, blocked) else {
            return false;
        };
        if planned.is_empty() {
            // Already standing on a pickup that is also the drop; refuse
            // rather than bind a plan that can never fire an arrival.
            return false;
        }
        self.path = planned;
        self.assignment = Some(assignment);
        self.state = if self.pos == assignment.pickup {
            AgentState::MovingToDrop
        } else {
            AgentState::MovingToPickup
        };
        true
    }

    /// Plan the single leg back to the depot and commit to it.
    ///
    /// Starts a fresh plan cycle: hazard memory is cleared. Returns
    /// `false`, leaving all state untouched, when no route home exists.
    pub fn plan_return(&mut self, grid: &Grid, blocked: &CellSet) -> bool {
        self.hazards.clear();
        let route = find_path(grid, self.pos, self.home, blocked);
        if route.is_empty() {
            return false;
        }
        self.path = route.into_iter().skip(1).collect();
        self.state = if self.path.is_empty() {
            AgentState::Idle
        } else {
            AgentState::Returning
        };
        true
    }

    /// Detach the current assignment without touching motion.
    ///
    /// Used by the shift-end protocol: the task binding clears but any
    /// in-flight path keeps executing until a return plan replaces it.
    pub fn detach_assignment(&mut self) {
        self.assignment = None;
    }

    /// Stop in place and go idle, dropping any planned path.
    pub fn park(&mut self) {
        self.path.clear();
        self.state = AgentState::Idle;
    }

    // ── Reactive replanning ─────────────────────────────────────

    /// Scan the sensor horizon and replan the remaining route if needed.
    ///
    /// No-op when idle. Any of the next `scan_range` planned cells found
    /// in `dynamic` joins the hazard memory and forces an immediate
    /// replan of the remaining route (both legs when still heading to
    /// pickup, the single remaining leg otherwise) against
    /// `hazards ∪ others`. A stranded robot (non-idle with an empty
    /// path after an earlier failed replan) retries here too.
    ///
    /// Returns `true` iff a new plan was installed this call. On a
    /// failed replan the path is cleared and the robot waits in place,
    /// to be retried next tick.
    pub fn scan_and_react(&mut self, grid: &Grid, dynamic: &CellSet, others: &CellSet) -> bool {
        if self.state == AgentState::Idle {
            return false;
        }
        let mut hazard_ahead = false;
        for cell in self.path.iter().take(self.scan_range) {
            if dynamic.contains(cell) {
                self.hazards.insert(*cell);
                hazard_ahead = true;
            }
        }
        let stranded = self.path.is_empty();
        if !hazard_ahead && !stranded {
            return false;
        }

        let mut blocked = self.hazards.clone();
        blocked.extend(others.iter().copied());
        self.replan_remaining(grid, &blocked)
    }

    /// Recompute the remaining route for the current state.
    ///
    /// Unlike the public planners this does not clear hazard memory:
    /// a reactive replan is part of the same plan cycle.
    fn replan_remaining(&mut self, grid: &Grid, blocked: &CellSet) -> bool {
        let planned = match self.state {
            AgentState::MovingToPickup => self
                .assignment
                .and_then(|a| plan_task_route(grid, self.pos, a, blocked)),
            AgentState::MovingToDrop => self.assignment.map(|a| a.drop).and_then(|drop| {
                let route = find_path(grid, self.pos, drop, blocked);
                (!route.is_empty()).then(|| route.into_iter().skip(1).collect())
            }),
            AgentState::Returning => {
                let route = find_path(grid, self.pos, self.home, blocked);
                (!route.is_empty()).then(|| route.into_iter().skip(1).collect())
            }
            AgentState::Idle => None,
        };
        match planned {
            Some(path) => {
                self.path = path;
                true
            }
            None => {
                self.path.clear();
                false
            }
        }
    }

    // ── Movement ────────────────────────────────────────────────

    /// Advance one cell if the pace allows, firing arrival transitions.
    ///
    /// The pace counter increments every call; the robot only moves when
    /// it reaches `pace`, which then resets it: planning runs every
    /// tick while physical motion is throttled. With an empty path the robot
    /// waits in place and no transition fires.
    ///
    /// Arrival transitions chain within one step, so a pickup that is
    /// also the drop completes in a single advance: pickup reached while
    /// `MovingToPickup` → `MovingToDrop`; drop reached while
    /// `MovingToDrop` → assignment cleared, `Idle`,
    /// `Arrival::Delivered`; home reached while `Returning` → `Idle`,
    /// `Arrival::Home`.
    pub fn advance(&mut self) -> Option<Arrival> {
        self.pace_counter += 1;
        if self.pace_counter < self.pace {
            return None;
        }
        self.pace_counter = 0;

        let next = self.path.pop_front()?;
        self.pos = next;

        let mut arrival = None;
        if self.state == AgentState::MovingToPickup {
            if let Some(a) = self.assignment {
                if self.pos == a.pickup {
                    self.state = AgentState::MovingToDrop;
                    arrival = Some(Arrival::PickedUp);
                }
            }
        }
        if self.state == AgentState::MovingToDrop {
            if let Some(a) = self.assignment {
                if self.pos == a.drop {
                    self.state = AgentState::Idle;
                    self.assignment = None;
                    self.path.clear();
                    return Some(Arrival::Delivered(a.task));
                }
            }
        }
        if self.state == AgentState::Returning && self.pos == self.home {
            self.state = AgentState::Idle;
            self.path.clear();
            return Some(Arrival::Home);
        }
        arrival
    }
}

/// Compute the two-leg route for a task from `pos`, or `None` if either
/// leg has no path. The returned route excludes `pos` itself.
fn plan_task_route(
    grid: &Grid,
    pos: Cell,
    assignment: Assignment,
    blocked: &CellSet,
) -> Option<VecDeque<Cell>> {
    let leg1 = find_path(grid, pos, assignment.pickup, blocked);
    if leg1.is_empty() {
        return None;
    }
    // Leg 2 must not re-enter leg 1's cells, except the pickup itself —
    // that cell is leg 2's start and has to stay enterable.
    let mut leg2_blocked = blocked.clone();
    leg2_blocked.extend(
        leg1.iter()
            .copied()
            .filter(|cell| *cell != assignment.pickup),
    );
    let leg2 = find_path(grid, assignment.pickup, assignment.drop, &leg2_blocked);
    if leg2.is_empty() {
        return None;
    }
    Some(
        leg1.into_iter()
            .skip(1)
            .chain(leg2.into_iter().skip(1))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_test_utils::{cell, cells, grid_from_rows};

    fn open5() -> Grid {
        grid_from_rows(&[".....", ".....", ".....", ".....", "....."])
    }

    fn assignment(task: u64, pickup: Cell, drop: Cell) -> Assignment {
        Assignment {
            task: TaskId(task),
            pickup,
            drop,
        }
    }

    fn robot_at(home: Cell) -> Robot {
        Robot::new(AgentId(0), home, 1, 2)
    }

    // ── Task planning ───────────────────────────────────────────

    #[test]
    fn plan_for_task_splices_both_legs() {
        let grid = open5();
        let mut r = robot_at(cell(0, 0));
        let ok = r.plan_for_task(&grid, assignment(0, cell(0, 4), cell(4, 4)), &CellSet::new());
        assert!(ok);
        assert_eq!(r.state(), AgentState::MovingToPickup);
        assert_eq!(r.current_task(), Some(TaskId(0)));
        // Leg 1: 4 moves to (0,4); leg 2: 4 moves to (4,4).
        assert_eq!(r.path_len(), 8);
    }

    #[test]
    fn plan_failure_leaves_state_untouched() {
        // Pickup sealed off by shelving.
        let grid = grid_from_rows(&["..#.", "..#.", "..#.", "..#."]);
        let mut r = robot_at(cell(0, 0));
        let ok = r.plan_for_task(&grid, assignment(0, cell(0, 3), cell(3, 3)), &CellSet::new());
        assert!(!ok);
        assert_eq!(r.state(), AgentState::Idle);
        assert_eq!(r.current_task(), None);
        assert_eq!(r.path_len(), 0);
    }

    #[test]
    fn leg_two_avoids_leg_one_but_may_enter_pickup() {
        // Corridor: the only drop route re-uses the pickup cell as its
        // start, which must be allowed.
        let grid = grid_from_rows(&["...", "###", "..."]);
        let mut r = robot_at(cell(0, 0));
        let ok = r.plan_for_task(&grid, assignment(0, cell(0, 1), cell(0, 2)), &CellSet::new());
        assert!(ok);
        assert_eq!(r.path_len(), 2);
    }

    #[test]
    fn plan_starting_on_pickup_goes_straight_to_drop() {
        let grid = open5();
        let mut r = robot_at(cell(0, 0));
        let ok = r.plan_for_task(&grid, assignment(0, cell(0, 0), cell(0, 3)), &CellSet::new());
        assert!(ok);
        assert_eq!(r.state(), AgentState::MovingToDrop);
        assert_eq!(r.path_len(), 3);
    }

    #[test]
    fn degenerate_pickup_drop_on_own_cell_is_refused() {
        let grid = open5();
        let mut r = robot_at(cell(2, 2));
        let ok = r.plan_for_task(&grid, assignment(0, cell(2, 2), cell(2, 2)), &CellSet::new());
        assert!(!ok);
        assert_eq!(r.state(), AgentState::Idle);
    }

    #[test]
    fn plan_respects_blocked_set() {
        let grid = open5();
        let mut r = robot_at(cell(0, 0));
        // Another robot's reservation along the top row forces a detour.
        let blocked = cells(&[(0, 2)]);
        let ok = r.plan_for_task(&grid, assignment(0, cell(0, 4), cell(4, 4)), &blocked);
        assert!(ok);
        assert!(r.planned_path().all(|c| c != cell(0, 2)));
        assert!(r.path_len() > 8);
    }

    // ── Return planning ─────────────────────────────────────────

    #[test]
    fn plan_return_heads_home() {
        let grid = open5();
        let mut r = robot_at(cell(0, 0));
        r.plan_for_task(&grid, assignment(0, cell(0, 2), cell(2, 2)), &CellSet::new());
        for _ in 0..2 {
            r.advance();
        }
        assert_eq!(r.pos(), cell(0, 2));

        r.detach_assignment();
        assert!(r.plan_return(&grid, &CellSet::new()));
        assert_eq!(r.state(), AgentState::Returning);
        assert_eq!(r.path_len(), 2);
    }

    #[test]
    fn plan_return_at_home_goes_idle() {
        let grid = open5();
        let mut r = robot_at(cell(1, 1));
        assert!(r.plan_return(&grid, &CellSet::new()));
        assert_eq!(r.state(), AgentState::Idle);
        assert_eq!(r.path_len(), 0);
    }

    // ── Movement and arrivals ───────────────────────────────────

    #[test]
    fn full_task_cycle_fires_arrivals() {
        let grid = open5();
        let mut r = robot_at(cell(0, 0));
        r.plan_for_task(&grid, assignment(7, cell(0, 4), cell(4, 4)), &CellSet::new());

        let mut arrivals = Vec::new();
        for _ in 0..8 {
            if let Some(a) = r.advance() {
                arrivals.push(a);
            }
        }
        assert_eq!(
            arrivals,
            vec![Arrival::PickedUp, Arrival::Delivered(TaskId(7))]
        );
        assert_eq!(r.pos(), cell(4, 4));
        assert_eq!(r.state(), AgentState::Idle);
        assert_eq!(r.current_task(), None);
    }

    #[test]
    fn pace_throttles_movement() {
        let grid = open5();
        let mut r = Robot::new(AgentId(0), cell(0, 0), 3, 2);
        r.plan_for_task(&grid, assignment(0, cell(0, 2), cell(0, 4)), &CellSet::new());

        // Two ticks of waiting, then one move.
        assert!(r.advance().is_none());
        assert_eq!(r.pos(), cell(0, 0));
        assert!(r.advance().is_none());
        assert_eq!(r.pos(), cell(0, 0));
        r.advance();
        assert_eq!(r.pos(), cell(0, 1));
    }

    #[test]
    fn empty_path_waits_in_place() {
        let mut r = robot_at(cell(2, 2));
        assert!(r.advance().is_none());
        assert_eq!(r.pos(), cell(2, 2));
        assert_eq!(r.state(), AgentState::Idle);
    }

    #[test]
    fn pickup_equals_drop_completes_in_one_step() {
        let grid = open5();
        let mut r = robot_at(cell(0, 0));
        let ok = r.plan_for_task(&grid, assignment(1, cell(0, 1), cell(0, 1)), &CellSet::new());
        assert!(ok);
        assert_eq!(r.advance(), Some(Arrival::Delivered(TaskId(1))));
        assert_eq!(r.state(), AgentState::Idle);
    }

    #[test]
    fn returning_robot_goes_idle_at_home() {
        let grid = open5();
        let mut r = robot_at(cell(0, 0));
        r.plan_for_task(&grid, assignment(0, cell(0, 1), cell(0, 2)), &CellSet::new());
        r.detach_assignment();
        r.advance();
        assert!(r.plan_return(&grid, &CellSet::new()));
        let mut last = None;
        for _ in 0..4 {
            if let Some(a) = r.advance() {
                last = Some(a);
            }
        }
        assert_eq!(last, Some(Arrival::Home));
        assert!(r.is_at_home());
        assert_eq!(r.state(), AgentState::Idle);
    }

    // ── Reactive replanning ─────────────────────────────────────

    #[test]
    fn idle_robot_never_reacts() {
        let grid = open5();
        let mut r = robot_at(cell(0, 0));
        let dynamic = cells(&[(0, 1)]);
        assert!(!r.scan_and_react(&grid, &dynamic, &CellSet::new()));
    }

    #[test]
    fn hazard_in_scan_range_triggers_replan() {
        let grid = open5();
        let mut r = robot_at(cell(0, 0));
        r.plan_for_task(&grid, assignment(0, cell(0, 4), cell(4, 4)), &CellSet::new());
        let before: Vec<Cell> = r.planned_path().collect();

        let dynamic = cells(&[(0, 1)]);
        assert!(r.scan_and_react(&grid, &dynamic, &CellSet::new()));
        let after: Vec<Cell> = r.planned_path().collect();
        assert_ne!(before, after);
        assert!(r.hazards().contains(&cell(0, 1)));
        assert!(after.iter().all(|c| *c != cell(0, 1)));
    }

    #[test]
    fn hazard_beyond_scan_range_is_ignored() {
        let grid = open5();
        let mut r = robot_at(cell(0, 0)); // scan_range 2
        r.plan_for_task(&grid, assignment(0, cell(0, 4), cell(4, 4)), &CellSet::new());

        let dynamic = cells(&[(0, 4)]);
        assert!(!r.scan_and_react(&grid, &dynamic, &CellSet::new()));
        assert!(r.hazards().is_empty());
    }

    #[test]
    fn hazard_memory_stands_for_the_task_cycle() {
        let grid = open5();
        let mut r = robot_at(cell(0, 0));
        r.plan_for_task(&grid, assignment(0, cell(0, 4), cell(4, 4)), &CellSet::new());

        let dynamic = cells(&[(0, 1)]);
        assert!(r.scan_and_react(&grid, &dynamic, &CellSet::new()));

        // The obstacle despawns, but the memory keeps the replan away
        // from it within this plan cycle.
        assert!(r.hazards().contains(&cell(0, 1)));
        let empty = CellSet::new();
        assert!(!r.scan_and_react(&grid, &empty, &empty));
        assert!(r.planned_path().all(|c| c != cell(0, 1)));
    }

    #[test]
    fn fresh_plan_clears_hazard_memory() {
        let grid = open5();
        let mut r = robot_at(cell(0, 0));
        r.plan_for_task(&grid, assignment(0, cell(0, 4), cell(4, 4)), &CellSet::new());
        let dynamic = cells(&[(0, 1)]);
        r.scan_and_react(&grid, &dynamic, &CellSet::new());
        assert!(!r.hazards().is_empty());

        // Finish the cycle, then plan a new task.
        while r.state() != AgentState::Idle {
            r.advance();
        }
        r.plan_for_task(&grid, assignment(1, cell(2, 0), cell(2, 4)), &CellSet::new());
        assert!(r.hazards().is_empty());
    }

    #[test]
    fn blocked_replan_strands_then_recovers() {
        // Single corridor: a hazard on it leaves no alternative.
        let grid = grid_from_rows(&["....", "####"]);
        let mut r = robot_at(cell(0, 0));
        r.plan_for_task(&grid, assignment(0, cell(0, 3), cell(0, 3)), &CellSet::new());

        let dynamic = cells(&[(0, 1)]);
        assert!(!r.scan_and_react(&grid, &dynamic, &CellSet::new()));
        assert_eq!(r.path_len(), 0, "failed replan clears the path");
        assert_eq!(r.state(), AgentState::MovingToPickup);

        // The stranded retry keeps using the standing hazard memory,
        // so it fails again even after the obstacle despawns.
        assert!(!r.scan_and_react(&grid, &CellSet::new(), &CellSet::new()));

        // A fresh coordinator-driven plan clears the memory and succeeds.
        assert!(r.plan_for_task(
            &grid,
            assignment(0, cell(0, 3), cell(0, 3)),
            &CellSet::new()
        ));
        assert_eq!(r.path_len(), 3);
    }

    #[test]
    fn returning_robot_replans_around_hazard() {
        let grid = open5();
        let mut r = robot_at(cell(0, 0));
        r.plan_for_task(&grid, assignment(0, cell(0, 2), cell(0, 4)), &CellSet::new());
        for _ in 0..4 {
            r.advance();
        }
        r.detach_assignment();
        assert!(r.plan_return(&grid, &CellSet::new()));
        let dynamic: CellSet = r.planned_path().take(1).collect();
        assert!(r.scan_and_react(&grid, &dynamic, &CellSet::new()));
        assert_eq!(r.state(), AgentState::Returning);
        assert!(r.planned_path().all(|c| !dynamic.contains(&c)));
    }

    #[test]
    fn replan_avoids_other_reservations() {
        let grid = open5();
        let mut r = robot_at(cell(0, 0));
        r.plan_for_task(&grid, assignment(0, cell(0, 4), cell(4, 4)), &CellSet::new());

        let dynamic = cells(&[(0, 1)]);
        let others = cells(&[(1, 1), (1, 2)]);
        assert!(r.scan_and_react(&grid, &dynamic, &others));
        assert!(r
            .planned_path()
            .all(|c| !others.contains(&c) && c != cell(0, 1)));
    }
}

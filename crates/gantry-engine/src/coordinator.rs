//! Global scheduling, reservation arbitration, and tick orchestration.

use crate::config::{ConfigError, FleetConfig};
use crate::metrics::TickMetrics;
use crate::obstacles::DynamicObstacles;
use crate::snapshot::{AgentSnapshot, FleetSnapshot, TaskSnapshot};
use gantry_agent::path::find_path;
use gantry_agent::robot::{Arrival, Robot};
use gantry_core::{AgentId, AgentState, Cell, CellSet, Task, TaskId, TaskRejection, TaskStatus, TickId};
use gantry_grid::Grid;
use indexmap::IndexMap;
use std::time::Instant;

/// Separates the dynamic-obstacle stream from any layout stream derived
/// from the same seed, so the two never replay the same draws.
const OBSTACLE_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// The owning aggregate for one simulation.
///
/// All mutable state — grid, robots, tasks, dynamic obstacles — lives
/// here, and every mutation routes through these methods. The engine is
/// single-threaded cooperative: one [`tick`](Coordinator::tick) runs to
/// completion before the next begins, and every reservation snapshot is
/// computed fresh at the step that consumes it.
#[derive(Debug)]
pub struct Coordinator {
    grid: Grid,
    robots: Vec<Robot>,
    tasks: IndexMap<TaskId, Task>,
    next_task_id: u64,
    obstacles: DynamicObstacles,
    shift_ending: bool,
    tick_id: TickId,
    rejected_tasks: u64,
    metrics: TickMetrics,
}

impl Coordinator {
    /// Build a fleet from a validated configuration.
    ///
    /// Takes ownership of the configured floor, parks one robot per
    /// home, and seeds the dynamic-obstacle stream. Fails fast on any
    /// structural problem — this is the engine's only fatal error
    /// surface.
    pub fn new(config: FleetConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let robots = config
            .homes
            .iter()
            .enumerate()
            .map(|(i, home)| Robot::new(AgentId(i as u32), *home, config.pace, config.scan_range))
            .collect();
        Ok(Self {
            grid: config.grid,
            robots,
            tasks: IndexMap::new(),
            next_task_id: 0,
            obstacles: DynamicObstacles::new(
                config.seed ^ OBSTACLE_STREAM,
                config.spawn_probability,
                config.despawn_probability,
            ),
            shift_ending: false,
            tick_id: TickId(0),
            rejected_tasks: 0,
            metrics: TickMetrics::default(),
        })
    }

    // ── Accessors ───────────────────────────────────────────────

    /// The warehouse floor.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The robots, in id order.
    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    /// Current tick (0 before the first [`tick`](Coordinator::tick)).
    pub fn tick_id(&self) -> TickId {
        self.tick_id
    }

    /// Whether the shift-end recall is in progress.
    pub fn is_shift_ending(&self) -> bool {
        self.shift_ending
    }

    /// Metrics from the most recent tick.
    pub fn last_metrics(&self) -> &TickMetrics {
        &self.metrics
    }

    /// Cumulative count of rejected task-creation requests.
    pub fn rejected_tasks(&self) -> u64 {
        self.rejected_tasks
    }

    /// The static obstacle set.
    pub fn static_obstacles(&self) -> &CellSet {
        self.grid.obstacles()
    }

    /// The dynamic obstacle set at the current tick.
    pub fn dynamic_obstacles(&self) -> &CellSet {
        self.obstacles.cells()
    }

    // ── Task intake ─────────────────────────────────────────────

    /// Queue a pickup-and-drop task.
    ///
    /// Rejected, with no state change beyond the rejection counter,
    /// while the shift is ending or when either endpoint is off-grid or
    /// on a static obstacle. Dynamic obstacles do not reject intake;
    /// they only delay planning.
    pub fn add_task(&mut self, pickup: Cell, drop: Cell) -> Result<TaskId, TaskRejection> {
        let result = self.check_intake(pickup, drop);
        match result {
            Ok(()) => {
                let id = TaskId(self.next_task_id);
                self.next_task_id += 1;
                self.tasks.insert(id, Task::new(id, pickup, drop));
                Ok(id)
            }
            Err(rejection) => {
                self.rejected_tasks += 1;
                Err(rejection)
            }
        }
    }

    fn check_intake(&self, pickup: Cell, drop: Cell) -> Result<(), TaskRejection> {
        if self.shift_ending {
            return Err(TaskRejection::ShiftEnding);
        }
        for cell in [pickup, drop] {
            if !self.grid.is_valid(cell) {
                return Err(TaskRejection::OutOfBounds { cell });
            }
            if self.grid.is_blocked(cell) {
                return Err(TaskRejection::Blocked { cell });
            }
        }
        Ok(())
    }

    // ── Reservations ────────────────────────────────────────────

    /// Cells claimed by every active robot except `exclude`: current
    /// position plus the entire planned path.
    ///
    /// Idle robots contribute nothing — a parked robot must never block
    /// path planning for an active one; the coordinator only arbitrates
    /// between robots that have committed to motion.
    pub fn active_reservations(&self, exclude: Option<AgentId>) -> CellSet {
        let mut reserved = CellSet::new();
        for robot in &self.robots {
            if !robot.state().is_active() || Some(robot.id()) == exclude {
                continue;
            }
            reserved.insert(robot.pos());
            reserved.extend(robot.planned_path());
        }
        reserved
    }

    // ── Shift end ───────────────────────────────────────────────

    /// Begin recalling the fleet to its depots. Idempotent.
    ///
    /// Every pending or assigned task is cancelled and every robot's
    /// task binding detached — in-flight motion is not interrupted; the
    /// per-tick dispatch replaces it with return plans. New task intake
    /// is refused until every robot is idle at home, at which point the
    /// mode reverts on its own.
    pub fn initiate_shift_end(&mut self) {
        if self.shift_ending {
            return;
        }
        self.shift_ending = true;
        for task in self.tasks.values_mut() {
            if matches!(task.status, TaskStatus::Pending | TaskStatus::Assigned) {
                task.status = TaskStatus::Cancelled;
            }
        }
        for robot in &mut self.robots {
            robot.detach_assignment();
        }
    }

    // ── Tick orchestration ──────────────────────────────────────

    /// Advance the simulation one step.
    ///
    /// Fixed order: (1) dynamic-obstacle update, (2) per-robot scan and
    /// react, (3) shift-end dispatch or task assignment, (4) paced
    /// movement, (5) reap finished tasks.
    pub fn tick(&mut self) {
        let tick_start = Instant::now();
        let mut metrics = TickMetrics::default();

        let t = Instant::now();
        let occupied: CellSet = self.robots.iter().map(|r| r.pos()).collect();
        let (spawned, despawned) = self.obstacles.update(&self.grid, &occupied);
        metrics.obstacles_spawned = spawned;
        metrics.obstacles_despawned = despawned;
        metrics.environment_us = t.elapsed().as_micros() as u64;

        let t = Instant::now();
        for i in 0..self.robots.len() {
            let others = self.active_reservations(Some(self.robots[i].id()));
            if self.robots[i].scan_and_react(&self.grid, self.obstacles.cells(), &others) {
                metrics.replans_triggered += 1;
            }
        }
        metrics.scan_us = t.elapsed().as_micros() as u64;

        let t = Instant::now();
        if self.shift_ending {
            if self.all_robots_home_idle() {
                // Recall complete: back to normal operation.
                self.shift_ending = false;
                self.tasks.clear();
            } else {
                self.dispatch_returns();
            }
        } else {
            metrics.tasks_assigned = self.assign_pending();
        }
        metrics.dispatch_us = t.elapsed().as_micros() as u64;

        let t = Instant::now();
        for robot in &mut self.robots {
            if let Some(Arrival::Delivered(task_id)) = robot.advance() {
                if let Some(task) = self.tasks.get_mut(&task_id) {
                    task.status = TaskStatus::Completed;
                }
                metrics.tasks_completed += 1;
            }
        }
        metrics.advance_us = t.elapsed().as_micros() as u64;

        self.tasks
            .retain(|_, task| !matches!(task.status, TaskStatus::Completed | TaskStatus::Cancelled));

        self.tick_id = TickId(self.tick_id.0 + 1);
        metrics.total_us = tick_start.elapsed().as_micros() as u64;
        self.metrics = metrics;
    }

    /// Assign pending tasks to idle robots by true path cost.
    ///
    /// Tasks are considered in id order. For each, every idle robot's
    /// actual route cost to the pickup is computed against that robot's
    /// exclusion-adjusted reservation snapshot — straight-line distance
    /// misleads behind shelving. Robots with no feasible route sit out;
    /// with none feasible the task stays pending for a retry next tick.
    /// The cheapest feasible robot (ties to the lowest id) commits via
    /// `plan_for_task` against the same snapshot. The snapshot is
    /// rebuilt per task, so later tasks see earlier winners' paths.
    fn assign_pending(&mut self) -> u32 {
        let mut assigned = 0;
        let pending: Vec<TaskId> = self
            .tasks
            .values()
            .filter(|t| t.status == TaskStatus::Pending)
            .map(|t| t.id)
            .collect();

        for task_id in pending {
            let task = self.tasks[&task_id];

            let mut best: Option<(usize, usize)> = None;
            for (i, robot) in self.robots.iter().enumerate() {
                if robot.state() != AgentState::Idle {
                    continue;
                }
                let blocked = self.active_reservations(Some(robot.id()));
                let route = find_path(&self.grid, robot.pos(), task.pickup, &blocked);
                if route.is_empty() {
                    continue;
                }
                let cost = route.len() - 1;
                // Strict less-than keeps the lowest id among equal costs,
                // since robots iterate in id order.
                if best.map_or(true, |(c, _)| cost < c) {
                    best = Some((cost, i));
                }
            }

            let Some((_, winner)) = best else {
                continue;
            };
            let blocked = self.active_reservations(Some(self.robots[winner].id()));
            if self.robots[winner].plan_for_task(&self.grid, task.assignment(), &blocked) {
                if let Some(task) = self.tasks.get_mut(&task_id) {
                    task.status = TaskStatus::Assigned;
                }
                assigned += 1;
            }
        }
        assigned
    }

    /// One shift-end dispatch step.
    ///
    /// Robots are processed in ascending id order; each newly committed
    /// return path is visible to the next robot's reservation snapshot,
    /// which is what prevents two returning robots from planning
    /// mutually colliding routes in the same tick. A robot caught
    /// standing on its home cell is parked where it is.
    fn dispatch_returns(&mut self) {
        for i in 0..self.robots.len() {
            if self.robots[i].state() == AgentState::Returning {
                continue;
            }
            if self.robots[i].is_at_home() {
                if self.robots[i].state() != AgentState::Idle {
                    self.robots[i].park();
                }
                continue;
            }
            let blocked = self.active_reservations(Some(self.robots[i].id()));
            // A failed plan leaves the robot in place for a retry next tick.
            self.robots[i].plan_return(&self.grid, &blocked);
        }
    }

    fn all_robots_home_idle(&self) -> bool {
        self.robots
            .iter()
            .all(|r| r.state() == AgentState::Idle && r.is_at_home())
    }

    // ── Snapshots ───────────────────────────────────────────────

    /// Per-robot views, in id order.
    pub fn agent_snapshots(&self) -> Vec<AgentSnapshot> {
        self.robots
            .iter()
            .map(|r| AgentSnapshot {
                id: r.id(),
                pos: r.pos(),
                state: r.state(),
                next_pos: r.next_pos(),
            })
            .collect()
    }

    /// Per-task views for every live (pending or assigned) task, in id
    /// order. Completed and cancelled tasks never appear: they are
    /// reaped at the end of the tick that finished them.
    pub fn task_snapshots(&self) -> Vec<TaskSnapshot> {
        self.tasks
            .values()
            .filter(|t| matches!(t.status, TaskStatus::Pending | TaskStatus::Assigned))
            .map(|t| TaskSnapshot {
                id: t.id,
                pickup: t.pickup,
                drop: t.drop,
                status: t.status,
            })
            .collect()
    }

    /// A full owned snapshot of the current state.
    pub fn snapshot(&self) -> FleetSnapshot {
        FleetSnapshot {
            tick: self.tick_id,
            shift_ending: self.shift_ending,
            agents: self.agent_snapshots(),
            tasks: self.task_snapshots(),
            static_obstacles: self.grid.obstacles().iter().copied().collect(),
            dynamic_obstacles: self.obstacles.cells().iter().copied().collect(),
        }
    }

    /// Inject a dynamic obstacle directly, bypassing the stochastic
    /// stream. For scripted scenarios and tests.
    pub fn inject_obstacle(&mut self, cell: Cell) {
        self.obstacles.insert(cell);
    }
}

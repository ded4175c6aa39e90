//! Background tick thread for polling presentation layers.
//!
//! The tick thread owns the [`Coordinator`] exclusively (moved in via
//! `thread::spawn`); there are no locks on the hot path. Commands arrive
//! over a bounded crossbeam channel and replies return on per-call
//! channels. Between commands the thread ticks at the configured
//! interval; without one it ticks only on explicit `step` requests.

use crate::config::{ConfigError, FleetConfig};
use crate::coordinator::Coordinator;
use crate::snapshot::FleetSnapshot;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use gantry_core::{Cell, TaskId, TaskRejection, TickId};
use std::error::Error;
use std::fmt;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Capacity of the command channel. Senders block briefly if the tick
/// thread falls behind, which is the backpressure we want.
const COMMAND_QUEUE_DEPTH: usize = 64;

/// Errors surfaced by the [`RealtimeFleet`] handle.
#[derive(Debug, PartialEq, Eq)]
pub enum RunnerError {
    /// The tick thread has shut down; the fleet is gone.
    Disconnected,
    /// The engine refused the task.
    Rejected(TaskRejection),
}

impl fmt::Display for RunnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "fleet tick thread has shut down"),
            Self::Rejected(r) => write!(f, "task rejected: {r}"),
        }
    }
}

impl Error for RunnerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rejected(r) => Some(r),
            Self::Disconnected => None,
        }
    }
}

impl From<TaskRejection> for RunnerError {
    fn from(r: TaskRejection) -> Self {
        Self::Rejected(r)
    }
}

enum FleetCommand {
    AddTask {
        pickup: Cell,
        drop: Cell,
        reply: Sender<Result<TaskId, TaskRejection>>,
    },
    InitiateShiftEnd,
    Step {
        reply: Sender<TickId>,
    },
    Snapshot {
        reply: Sender<FleetSnapshot>,
    },
    Shutdown,
}

/// Handle to a fleet running on its own tick thread.
///
/// Cloneable handles are deliberately not offered: one owner, one
/// shutdown. Dropping the handle stops the thread.
#[derive(Debug)]
pub struct RealtimeFleet {
    commands: Sender<FleetCommand>,
    handle: Option<JoinHandle<()>>,
}

impl RealtimeFleet {
    /// Build the coordinator and move it onto a named tick thread.
    ///
    /// Construction errors surface synchronously, before any thread
    /// exists.
    pub fn spawn(config: FleetConfig) -> Result<Self, ConfigError> {
        let tick_interval = config.tick_interval;
        let coordinator = Coordinator::new(config)?;
        let (tx, rx) = bounded(COMMAND_QUEUE_DEPTH);
        let handle = thread::Builder::new()
            .name("gantry-tick".into())
            .spawn(move || run_loop(coordinator, rx, tick_interval))
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: e.to_string(),
            })?;
        Ok(Self {
            commands: tx,
            handle: Some(handle),
        })
    }

    /// Queue a task on the running fleet.
    pub fn add_task(&self, pickup: Cell, drop: Cell) -> Result<TaskId, RunnerError> {
        let (reply, response) = bounded(1);
        self.commands
            .send(FleetCommand::AddTask {
                pickup,
                drop,
                reply,
            })
            .map_err(|_| RunnerError::Disconnected)?;
        response
            .recv()
            .map_err(|_| RunnerError::Disconnected)?
            .map_err(RunnerError::Rejected)
    }

    /// Begin the shift-end recall.
    pub fn initiate_shift_end(&self) -> Result<(), RunnerError> {
        self.commands
            .send(FleetCommand::InitiateShiftEnd)
            .map_err(|_| RunnerError::Disconnected)
    }

    /// Run one tick now and return the new tick id.
    ///
    /// The manual complement to interval ticking; with no interval
    /// configured this is the only way time advances.
    pub fn step(&self) -> Result<TickId, RunnerError> {
        let (reply, response) = bounded(1);
        self.commands
            .send(FleetCommand::Step { reply })
            .map_err(|_| RunnerError::Disconnected)?;
        response.recv().map_err(|_| RunnerError::Disconnected)
    }

    /// Fetch an owned snapshot of the current state.
    pub fn snapshot(&self) -> Result<FleetSnapshot, RunnerError> {
        let (reply, response) = bounded(1);
        self.commands
            .send(FleetCommand::Snapshot { reply })
            .map_err(|_| RunnerError::Disconnected)?;
        response.recv().map_err(|_| RunnerError::Disconnected)
    }
}

impl Drop for RealtimeFleet {
    fn drop(&mut self) {
        let _ = self.commands.send(FleetCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_loop(
    mut coordinator: Coordinator,
    commands: Receiver<FleetCommand>,
    tick_interval: Option<Duration>,
) {
    match tick_interval {
        Some(interval) => {
            let mut next_tick = Instant::now() + interval;
            loop {
                let timeout = next_tick.saturating_duration_since(Instant::now());
                match commands.recv_timeout(timeout) {
                    Ok(command) => {
                        if handle_command(&mut coordinator, command) {
                            break;
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        coordinator.tick();
                        next_tick += interval;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        }
        None => {
            while let Ok(command) = commands.recv() {
                if handle_command(&mut coordinator, command) {
                    break;
                }
            }
        }
    }
}

/// Apply one command; returns true on shutdown.
fn handle_command(coordinator: &mut Coordinator, command: FleetCommand) -> bool {
    match command {
        FleetCommand::AddTask {
            pickup,
            drop,
            reply,
        } => {
            let _ = reply.send(coordinator.add_task(pickup, drop));
            false
        }
        FleetCommand::InitiateShiftEnd => {
            coordinator.initiate_shift_end();
            false
        }
        FleetCommand::Step { reply } => {
            coordinator.tick();
            let _ = reply.send(coordinator.tick_id());
            false
        }
        FleetCommand::Snapshot { reply } => {
            let _ = reply.send(coordinator.snapshot());
            false
        }
        FleetCommand::Shutdown => true,
    }
}

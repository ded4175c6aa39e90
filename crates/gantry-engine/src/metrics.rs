//! Per-tick metrics for the coordination engine.
//!
//! [`TickMetrics`] captures timing and event counts for a single tick.
//! The coordinator overwrites them after each `tick()`; consumers read
//! the most recent values for telemetry and profiling.

/// Timing and event metrics collected during a single tick.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickMetrics {
    /// Wall-clock time for the entire tick.
    pub total_us: u64,
    /// Time in the dynamic-obstacle update.
    pub environment_us: u64,
    /// Time in the scan-and-react pass.
    pub scan_us: u64,
    /// Time in task assignment or shift-end dispatch.
    pub dispatch_us: u64,
    /// Time advancing robots.
    pub advance_us: u64,
    /// Tasks that became assigned this tick.
    pub tasks_assigned: u32,
    /// Tasks delivered this tick.
    pub tasks_completed: u32,
    /// Robots that installed a new plan in the scan pass this tick.
    pub replans_triggered: u32,
    /// Dynamic obstacles that appeared this tick.
    pub obstacles_spawned: u32,
    /// Dynamic obstacles that vanished this tick.
    pub obstacles_despawned: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = TickMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.tasks_assigned, 0);
        assert_eq!(m.tasks_completed, 0);
        assert_eq!(m.replans_triggered, 0);
        assert_eq!(m.obstacles_spawned, 0);
        assert_eq!(m.obstacles_despawned, 0);
    }
}

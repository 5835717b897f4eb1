//! Step observer trait for progress reporting and data collection.

use sw_core::{AgentId, PartitionId, Tick};
use sw_mobility::RouteCache;

use crate::StepOutcome;

/// Callbacks invoked by [`Partition::run_step`][crate::Partition::run_step].
///
/// All methods default to no-ops.
pub trait StepObserver {
    fn on_step_start(&mut self, _partition: PartitionId, _tick: Tick) {}

    /// Called once per agent order, in processing order.
    fn on_outcome(
        &mut self,
        _partition: PartitionId,
        _tick:      Tick,
        _agent:     AgentId,
        _outcome:   StepOutcome,
    ) {}

    /// Called after moves are applied.  `moved` counts agents whose position
    /// changed.
    fn on_step_end(&mut self, _partition: PartitionId, _tick: Tick, _moved: usize) {}

    /// Called every `output_interval_ticks` steps with the route cache.
    fn on_snapshot(&mut self, _partition: PartitionId, _tick: Tick, _routes: &RouteCache) {}

    fn on_run_end(&mut self, _partition: PartitionId, _final_tick: Tick) {}
}

pub struct NoopObserver;

impl StepObserver for NoopObserver {}

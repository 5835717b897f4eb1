//! `StepOutputObserver<W>`: bridges `StepObserver` to an `OutputWriter`.

use sw_core::{AgentId, PartitionId, Tick};
use sw_mobility::RouteCache;
use sw_sim::{StepObserver, StepOutcome};

use crate::row::{OutcomeRow, RouteRow, StepSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`StepObserver`] that writes per-agent outcomes, step summaries, and
/// route-cache snapshots to any [`OutputWriter`].
///
/// Outcomes are buffered for the current step and written in one batch when
/// the step ends.  Writer errors are stored because observer methods have no
/// return value; check [`take_error`][Self::take_error] after the run.
pub struct StepOutputObserver<W: OutputWriter> {
    writer:     W,
    pending:    Vec<OutcomeRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> StepOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, pending: Vec::new(), last_error: None }
    }

    /// Take the stored write error, if any.  Only the first error is kept.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> StepObserver for StepOutputObserver<W> {
    fn on_step_start(&mut self, _partition: PartitionId, _tick: Tick) {
        self.pending.clear();
    }

    fn on_outcome(&mut self, partition: PartitionId, tick: Tick, agent: AgentId, outcome: StepOutcome) {
        let handed_to = match outcome {
            StepOutcome::HandedOff(to) => to.0,
            _ => u16::MAX,
        };
        self.pending.push(OutcomeRow {
            partition: partition.0,
            tick:      tick.0,
            agent:     agent.0,
            outcome:   outcome.as_str(),
            handed_to,
        });
    }

    fn on_step_end(&mut self, partition: PartitionId, tick: Tick, moved: usize) {
        let count = |pred: fn(&str) -> bool| self.pending.iter().filter(|r| pred(r.outcome)).count() as u64;
        let summary = StepSummaryRow {
            partition: partition.0,
            tick:      tick.0,
            orders:    self.pending.len() as u64,
            moved:     moved as u64,
            blocked:   count(|o: &str| o.starts_with("blocked")),
            handoffs:  count(|o: &str| o == "handed_off"),
        };

        let rows = std::mem::take(&mut self.pending);
        if !rows.is_empty() {
            let result = self.writer.write_outcomes(&rows);
            self.store_err(result);
        }
        let result = self.writer.write_step_summary(&summary);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, partition: PartitionId, tick: Tick, routes: &RouteCache) {
        let rows: Vec<RouteRow> = routes
            .listing()
            .into_iter()
            .map(|entry| RouteRow {
                partition: partition.0,
                tick:      tick.0,
                key:       entry.key,
                len:       entry.len as u64,
                hits:      routes.hits(),
                misses:    routes.misses(),
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_routes(&rows);
            self.store_err(result);
        }
    }

    fn on_run_end(&mut self, _partition: PartitionId, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}

//! The `OutputWriter` trait implemented by backend writers.

use crate::{OutcomeRow, OutputResult, RouteRow, StepSummaryRow};

/// Sink for partition output rows.
///
/// Errors are stored by the observer and retrieved with
/// [`StepOutputObserver::take_error`][crate::StepOutputObserver::take_error].
pub trait OutputWriter {
    fn write_outcomes(&mut self, rows: &[OutcomeRow]) -> OutputResult<()>;

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()>;

    fn write_routes(&mut self, rows: &[RouteRow]) -> OutputResult<()>;

    /// Flush all underlying file handles.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `step_outcomes.csv`
//! - `step_summaries.csv`
//! - `route_snapshots.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{OutcomeRow, OutputResult, RouteRow, StepSummaryRow};
use crate::writer::OutputWriter;

pub struct CsvWriter {
    outcomes:  Writer<File>,
    summaries: Writer<File>,
    routes:    Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the three CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut outcomes = Writer::from_path(dir.join("step_outcomes.csv"))?;
        outcomes.write_record(["partition", "tick", "agent", "outcome", "handed_to"])?;

        let mut summaries = Writer::from_path(dir.join("step_summaries.csv"))?;
        summaries.write_record(["partition", "tick", "orders", "moved", "blocked", "handoffs"])?;

        let mut routes = Writer::from_path(dir.join("route_snapshots.csv"))?;
        routes.write_record(["partition", "tick", "key", "len", "hits", "misses"])?;

        Ok(Self { outcomes, summaries, routes, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_outcomes(&mut self, rows: &[OutcomeRow]) -> OutputResult<()> {
        for row in rows {
            let handed_to = if row.handed_to == u16::MAX {
                String::new()
            } else {
                row.handed_to.to_string()
            };
            self.outcomes.write_record(&[
                row.partition.to_string(),
                row.tick.to_string(),
                row.agent.to_string(),
                row.outcome.to_owned(),
                handed_to,
            ])?;
        }
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.partition.to_string(),
            row.tick.to_string(),
            row.orders.to_string(),
            row.moved.to_string(),
            row.blocked.to_string(),
            row.handoffs.to_string(),
        ])?;
        Ok(())
    }

    fn write_routes(&mut self, rows: &[RouteRow]) -> OutputResult<()> {
        for row in rows {
            self.routes.write_record(&[
                row.partition.to_string(),
                row.tick.to_string(),
                row.key.clone(),
                row.len.to_string(),
                row.hits.to_string(),
                row.misses.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.outcomes.flush()?;
        self.summaries.flush()?;
        self.routes.flush()?;
        Ok(())
    }
}

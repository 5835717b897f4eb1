//! `sw-output` — partition output writers for the shardwalk framework.
//!
//! | File                   | One row per                             |
//! |------------------------|-----------------------------------------|
//! | `step_outcomes.csv`    | agent order per step                    |
//! | `step_summaries.csv`   | partition step                          |
//! | `route_snapshots.csv`  | route-cache entry per snapshot interval |
//!
//! [`CsvWriter`] implements [`OutputWriter`] and is driven by
//! [`StepOutputObserver`], which implements `sw_sim::StepObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sw_output::{CsvWriter, StepOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = StepOutputObserver::new(writer);
//! partition.run(&mut bus, &mut controller, &mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::StepOutputObserver;
pub use row::{OutcomeRow, RouteRow, StepSummaryRow};
pub use writer::OutputWriter;

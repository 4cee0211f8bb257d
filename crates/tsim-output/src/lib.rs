//! `tsim-output`: simulation output writers for the tsim traffic simulator.
//!
//! [`CsvWriter`] writes `vehicle_snapshots.csv`, `light_snapshots.csv`, and
//! `tick_summaries.csv`.  Any [`OutputWriter`] is driven by
//! [`SimOutputObserver`], which implements `tsim_engine::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tsim_output::{CsvWriter, SimOutputObserver};
//!
//! let mut obs = SimOutputObserver::new(CsvWriter::new(Path::new("./output"))?);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{LightSnapshotRow, TickSummaryRow, VehicleSnapshotRow};
pub use writer::OutputWriter;

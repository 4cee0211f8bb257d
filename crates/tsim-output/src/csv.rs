//! CSV output backend.
//!
//! Creates three files in the output directory:
//! - `vehicle_snapshots.csv`
//! - `light_snapshots.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{LightSnapshotRow, OutputResult, TickSummaryRow, VehicleSnapshotRow};

pub const VEHICLE_FILE: &str = "vehicle_snapshots.csv";
pub const LIGHT_FILE: &str = "light_snapshots.csv";
pub const SUMMARY_FILE: &str = "tick_summaries.csv";

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    vehicles:  Writer<File>,
    lights:    Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the three files in `dir` and write their header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut vehicles = Writer::from_path(dir.join(VEHICLE_FILE))?;
        vehicles.write_record(["vehicle_id", "tick", "label", "from", "to", "progress", "speed", "waiting"])?;

        let mut lights = Writer::from_path(dir.join(LIGHT_FILE))?;
        lights.write_record(["vertex", "tick", "open", "phase", "waited_secs"])?;

        let mut summaries = Writer::from_path(dir.join(SUMMARY_FILE))?;
        summaries.write_record(["tick", "delta", "elapsed_secs", "active", "arrived", "halted", "finished"])?;

        Ok(Self { vehicles, lights, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_vehicles(&mut self, rows: &[VehicleSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.vehicles.write_record(&[
                row.vehicle_id.to_string(),
                row.tick.to_string(),
                row.label.clone(),
                row.from.to_string(),
                row.to.to_string(),
                row.progress.to_string(),
                row.speed.to_string(),
                (row.waiting as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_lights(&mut self, rows: &[LightSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.lights.write_record(&[
                row.vertex.to_string(),
                row.tick.to_string(),
                (row.open as u8).to_string(),
                row.phase.to_string(),
                row.waited_secs.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.delta.to_string(),
            row.elapsed_secs.to_string(),
            row.active.to_string(),
            row.arrived.to_string(),
            row.halted.to_string(),
            row.finished.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.vehicles.flush()?;
        self.lights.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}

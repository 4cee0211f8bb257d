//! The `OutputWriter` trait implemented by output backends.

use crate::{LightSnapshotRow, OutputResult, TickSummaryRow, VehicleSnapshotRow};

/// A sink for the rows produced by [`SimOutputObserver`](crate::SimOutputObserver).
pub trait OutputWriter {
    fn write_vehicles(&mut self, rows: &[VehicleSnapshotRow]) -> OutputResult<()>;

    fn write_lights(&mut self, rows: &[LightSnapshotRow]) -> OutputResult<()>;

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush every underlying handle.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

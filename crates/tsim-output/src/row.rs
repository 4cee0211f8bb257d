//! Plain data rows written by output backends.

use tsim_engine::TickSummary;

/// One active vehicle at a snapshot tick.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSnapshotRow {
    pub vehicle_id: u32,
    pub tick:       u64,
    pub label:      String,
    /// Start of the edge being driven.
    pub from:       u32,
    pub to:         u32,
    pub progress:   f64,
    pub speed:      f64,
    pub waiting:    bool,
}

/// One traffic light at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSnapshotRow {
    /// Vertex the light stands at.
    pub vertex:      u32,
    pub tick:        u64,
    pub open:        bool,
    pub phase:       f64,
    pub waited_secs: f64,
}

/// Counts for one processed tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:         u64,
    pub delta:        f64,
    pub elapsed_secs: f64,
    pub active:       u64,
    pub arrived:      u64,
    pub halted:       u64,
    pub finished:     u64,
}

impl From<&TickSummary> for TickSummaryRow {
    fn from(s: &TickSummary) -> Self {
        Self {
            tick:         s.tick.0,
            delta:        s.delta,
            elapsed_secs: s.elapsed_secs,
            active:       s.active as u64,
            arrived:      s.arrived as u64,
            halted:       s.halted as u64,
            finished:     s.finished as u64,
        }
    }
}

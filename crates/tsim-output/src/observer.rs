//! `SimOutputObserver<W>` bridges `SimObserver` to an `OutputWriter`.

use tsim_core::Tick;
use tsim_engine::{SimObserver, SimView, TickSummary};

use crate::row::{LightSnapshotRow, TickSummaryRow, VehicleSnapshotRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes every tick summary, plus vehicle and light
/// snapshots at the engine's snapshot interval, to an [`OutputWriter`].
///
/// `SimObserver` hooks cannot fail, so the first write error is kept and
/// handed out by [`take_error`](Self::take_error) after the run.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// The first write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                log::warn!("output disabled after write error: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, _tick: Tick, summary: &TickSummary) {
        if self.last_error.is_some() {
            return;
        }
        let result = self.writer.write_tick_summary(&TickSummaryRow::from(summary));
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, view: &SimView<'_>) {
        if self.last_error.is_some() {
            return;
        }
        let vehicles: Vec<VehicleSnapshotRow> = view
            .vehicles
            .iter()
            .filter_map(|car| {
                let (from, to) = car.current_edge()?;
                Some(VehicleSnapshotRow {
                    vehicle_id: car.id().0,
                    tick:       tick.0,
                    label:      car.label().to_owned(),
                    from:       from.0,
                    to:         to.0,
                    progress:   car.progress(),
                    speed:      car.speed(),
                    waiting:    car.is_waiting(),
                })
            })
            .collect();
        let lights: Vec<LightSnapshotRow> = view
            .lights
            .iter()
            .map(|(at, light)| LightSnapshotRow {
                vertex:      at as u32,
                tick:        tick.0,
                open:        light.state().is_open(),
                phase:       light.phase(),
                waited_secs: light.waited_secs(),
            })
            .collect();

        let mut result = Ok(());
        if !vehicles.is_empty() {
            result = self.writer.write_vehicles(&vehicles);
        }
        if result.is_ok() && !lights.is_empty() {
            result = self.writer.write_lights(&lights);
        }
        self.store_err(result);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        let result = self.writer.finish();
        if result.is_ok() {
            log::info!("output flushed at {final_tick}");
        }
        self.store_err(result);
    }
}

//! The `Sim` struct and its tick loop.

use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use tsim_core::{EdgeId, SimClock, SimConfig, SparseIndex, TimeStep, VehicleId, VertexId};
use tsim_graph::{AnyGraph, Graph, RoadTable, Route, Router};
use tsim_signal::SignalController;
use tsim_vehicle::{MotionModel, StepOutcome, Vehicle, VehicleSpec};

use crate::observer::{EventBus, UPDATE, UpdateEvent};
use crate::{NoopObserver, SimError, SimObserver, SimResult, SimView, StopHandle, TickSummary};

/// Lifecycle of a [`Sim`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// Built, no tick processed yet.
    Configured,
    /// At least one tick processed; more may follow.
    Running,
    /// `run`/`start` returned.  Terminal.
    Stopped,
}

/// Why [`Sim::run`] ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    Horizon,
    Idle,
    Handle,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<G>` owns the road graph, the lights, the road table, and the active
/// vehicles, and drives the tick loop:
///
/// 1. **Delta**: the configured [`TimeStep`] or a caller-supplied value.
/// 2. **Lights**: every controller advances, ascending by vertex.
/// 3. **Vehicles**: every active vehicle advances, in insertion order.
/// 4. **Bookkeeping**: halted time is credited to the blocking light, and
///    finished vehicles are pruned (order of the rest is preserved).
/// 5. **Notify**: `"update"` handlers in registration order, then the
///    [`SimObserver`] hooks.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<G: Graph = AnyGraph> {
    pub(crate) config:       SimConfig,
    pub(crate) clock:        SimClock,
    pub(crate) state:        EngineState,
    pub(crate) graph:        G,
    pub(crate) lights:       SparseIndex<SignalController>,
    pub(crate) roads:        RoadTable,
    pub(crate) motion:       MotionModel,
    pub(crate) vehicles:     Vec<Vehicle>,
    pub(crate) next_vehicle: u32,
    pub(crate) bus:          EventBus,
    pub(crate) stop:         StopHandle,
    pub(crate) router:       Box<dyn Router>,
    pub(crate) last_wall:    Option<Instant>,
}

impl<G: Graph> Sim<G> {
    // ── Setup ─────────────────────────────────────────────────────────────

    /// Put a new vehicle at the start of its route.
    ///
    /// Takes effect from the next tick.  Ids are handed out sequentially and
    /// also seed the vehicle's RNG stream, so the same sequence of calls
    /// always produces the same traffic.
    pub fn add_car(&mut self, spec: VehicleSpec) -> SimResult<VehicleId> {
        let id = VehicleId(self.next_vehicle);
        let vehicle = Vehicle::new(id, spec, self.motion, self.config.seed, &self.graph)?;
        log::debug!("vehicle {id} '{}' added on route {:?}", vehicle.label(), vehicle.route());
        self.vehicles.push(vehicle);
        self.next_vehicle += 1;
        Ok(id)
    }

    /// Register `handler` under `event`.  Only `"update"` ever fires; it runs
    /// once per tick after vehicles have moved.
    pub fn on<F>(&mut self, event: &str, handler: F)
    where
        F: FnMut(&UpdateEvent<'_>) + 'static,
    {
        self.bus.on(event, Box::new(handler));
    }

    /// Shortest route over the engine's graph, usable as a vehicle route.
    pub fn plan_route(&self, from: VertexId, to: VertexId) -> SimResult<Route> {
        Ok(self.router.route(&self.graph, from, to)?)
    }

    /// A handle that ends [`run`](Self::run) before its next tick.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    // ── Driving ───────────────────────────────────────────────────────────

    /// Run until a stop condition holds, without an observer.
    pub fn start(&mut self) -> SimResult<StopReason> {
        self.run(&mut NoopObserver)
    }

    /// Run until the horizon is reached, the road is empty (with
    /// `stop_when_idle`), or the stop handle fires.  With none of these
    /// configured the loop only ends through the stop handle.
    ///
    /// The engine is `Stopped` afterwards, also when a tick fails.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<StopReason> {
        self.ensure_not_stopped()?;
        self.state = EngineState::Running;
        log::info!(
            "simulation started: {} vehicles, {} lights, {:?}",
            self.vehicles.len(),
            self.lights.occupied(),
            self.config.time_step,
        );

        let result = loop {
            if let Some(reason) = self.stop_reason() {
                break Ok(reason);
            }
            let delta = self.next_delta();
            if let Err(e) = self.process_tick(delta, observer) {
                break Err(e);
            }
        };

        self.state = EngineState::Stopped;
        observer.on_sim_end(self.clock.current_tick);
        match &result {
            Ok(reason) => log::info!("simulation stopped ({reason:?}) at {}", self.clock),
            Err(e) => log::error!("simulation aborted at {}: {e}", self.clock),
        }
        result
    }

    /// Run exactly `n` ticks (fewer if the stop handle fires), ignoring the
    /// horizon and idle conditions, then notify `on_sim_end`.  Leaves the
    /// engine `Running`.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        self.ensure_not_stopped()?;
        for _ in 0..n {
            if self.stop.is_stopped() {
                break;
            }
            let delta = self.next_delta();
            self.process_tick(delta, observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Process one tick with the configured time step.
    pub fn step(&mut self) -> SimResult<TickSummary> {
        self.ensure_not_stopped()?;
        let delta = self.next_delta();
        self.process_tick(delta, &mut NoopObserver)
    }

    /// Process one tick lasting `delta` simulated seconds.
    pub fn step_with(&mut self, delta: f64) -> SimResult<TickSummary> {
        self.ensure_not_stopped()?;
        if !(delta.is_finite() && delta > 0.0) {
            return Err(SimError::Config(format!("delta must be finite and > 0, got {delta}")));
        }
        self.process_tick(delta, &mut NoopObserver)
    }

    // ── Diagnostics ───────────────────────────────────────────────────────

    /// Write one line per active vehicle.
    pub fn dump_cars<W: Write + ?Sized>(&self, out: &mut W) -> std::io::Result<()> {
        self.view().dump_cars(out)
    }

    /// Write one line per traffic light.
    pub fn dump_traffic_lights<W: Write + ?Sized>(&self, out: &mut W) -> std::io::Result<()> {
        self.view().dump_traffic_lights(out)
    }

    pub fn view(&self) -> SimView<'_> {
        SimView { vehicles: &self.vehicles, lights: &self.lights, roads: &self.roads }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn lights(&self) -> &SparseIndex<SignalController> {
        &self.lights
    }

    pub fn roads(&self) -> &RoadTable {
        &self.roads
    }

    pub fn motion(&self) -> &MotionModel {
        &self.motion
    }

    /// Active vehicles in processing order.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Number of completed ticks.
    pub fn cycle(&self) -> u64 {
        self.clock.current_tick.0
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn ensure_not_stopped(&self) -> SimResult<()> {
        if self.state == EngineState::Stopped {
            return Err(SimError::InvalidState(self.state));
        }
        Ok(())
    }

    fn stop_reason(&self) -> Option<StopReason> {
        if self.stop.is_stopped() {
            Some(StopReason::Handle)
        } else if self.config.horizon_secs.is_some_and(|h| self.clock.reached(h)) {
            Some(StopReason::Horizon)
        } else if self.config.stop_when_idle && self.vehicles.is_empty() {
            Some(StopReason::Idle)
        } else {
            None
        }
    }

    /// Delta for the next tick from the configured time step.
    ///
    /// In real-time mode this is the wall time since the previous tick began,
    /// and with `max_tps` the loop sleeps until at least `1 / max_tps` has
    /// passed.
    fn next_delta(&mut self) -> f64 {
        match self.config.time_step {
            TimeStep::Fixed { secs } => secs,
            TimeStep::RealTime { max_tps } => {
                let measured = self.last_wall.map_or(0.0, |t| t.elapsed().as_secs_f64());
                let delta = match max_tps {
                    Some(tps) if measured < 1.0 / tps => {
                        thread::sleep(Duration::from_secs_f64(1.0 / tps - measured));
                        1.0 / tps
                    }
                    _ => measured,
                };
                self.last_wall = Some(Instant::now());
                delta
            }
        }
    }

    fn process_tick<O: SimObserver>(&mut self, delta: f64, observer: &mut O) -> SimResult<TickSummary> {
        if self.state == EngineState::Configured {
            self.state = EngineState::Running;
        }
        let tick = self.clock.current_tick;
        observer.on_tick_start(tick);

        // ── Phase 1: lights ───────────────────────────────────────────────
        for (_, light) in self.lights.iter_mut() {
            light.advance(delta);
        }

        // ── Phase 2: vehicles, in insertion order ─────────────────────────
        let mut summary = TickSummary {
            tick,
            delta,
            elapsed_secs: self.clock.elapsed_secs + delta,
            ..TickSummary::default()
        };
        let mut blocked: Vec<(VertexId, EdgeId)> = Vec::new();
        for vehicle in &mut self.vehicles {
            match vehicle.advance(delta, &self.graph, &self.roads, &self.lights)? {
                StepOutcome::Moved => summary.moved += 1,
                StepOutcome::Arrived { .. } => summary.arrived += 1,
                StepOutcome::Halted { at, edge } => {
                    summary.halted += 1;
                    blocked.push((at, edge));
                }
                StepOutcome::Finished => {
                    summary.finished += 1;
                    log::debug!("vehicle {} finished at {tick}", vehicle.id());
                }
            }
        }

        // ── Phase 3: wait accounting and pruning ──────────────────────────
        for (at, edge) in blocked {
            if let Some(light) = self.lights.get_mut(at.index()) {
                light.record_wait(edge, delta);
            }
        }
        self.vehicles.retain(|v| !v.is_finished());
        summary.active = self.vehicles.len();

        // ── Phase 4: notify ───────────────────────────────────────────────
        let view = SimView { vehicles: &self.vehicles, lights: &self.lights, roads: &self.roads };
        let event = UpdateEvent { tick, delta, elapsed_secs: summary.elapsed_secs, view };
        self.bus.emit(UPDATE, &event);

        observer.on_tick_end(tick, &summary);
        let interval = self.config.output_interval_ticks;
        if interval > 0 && tick.0.is_multiple_of(interval) {
            observer.on_snapshot(tick, &view);
        }

        self.clock.advance(delta);
        log::debug!(
            "{tick}: delta={delta:.3} active={} moved={} arrived={} halted={} finished={}",
            summary.active,
            summary.moved,
            summary.arrived,
            summary.halted,
            summary.finished,
        );
        Ok(summary)
    }
}

impl<G: Graph> std::fmt::Debug for Sim<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sim")
            .field("state", &self.state)
            .field("clock", &self.clock)
            .field("vehicles", &self.vehicles.len())
            .field("lights", &self.lights.occupied())
            .field("bus", &self.bus)
            .finish()
    }
}

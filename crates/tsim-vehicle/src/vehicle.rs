//! The per-vehicle route-following state machine.

use tsim_core::{EdgeId, VehicleId, VehicleRng, VertexId};
use tsim_graph::{Graph, RoadTable};
use tsim_signal::SignalLookup;

use crate::{MotionModel, VehicleError, VehicleResult, VehicleSpec};

/// What happened to a vehicle during one [`Vehicle::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Still strictly inside the current edge.
    Moved,
    /// Reached the end of the current edge at `at` and will cross next tick.
    Arrived { at: VertexId },
    /// Stopped at `at` because the light there has `edge` closed.
    Halted { at: VertexId, edge: EdgeId },
    /// Reached the last vertex of the route.
    Finished,
}

/// A vehicle driving a fixed route.
///
/// # Invariants
///
/// - `0 <= progress <= edge_weight` where `edge_weight` is the weight of
///   `route[cursor] → route[cursor + 1]`.
/// - `cursor` only moves forward, and only from `progress == edge_weight`.
/// - Once `finished`, `cursor` is the last route index and nothing changes.
#[derive(Debug, Clone)]
pub struct Vehicle {
    id:          VehicleId,
    spec:        VehicleSpec,
    motion:      MotionModel,
    cursor:      usize,
    progress:    f64,
    speed:       f64,
    edge_weight: f64,
    finished:    bool,
    rng:         VehicleRng,
}

impl Vehicle {
    /// Place a vehicle at the start of its route.
    ///
    /// `seed` is the run's global seed; the vehicle derives its own stream
    /// from it and `id`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter`/`InvalidRoute` for bad specs or motion models, and
    /// `Graph(NoSuchEdge | UnknownVertex)` if a route hop is not an edge.
    pub fn new<G: Graph + ?Sized>(
        id: VehicleId,
        spec: VehicleSpec,
        motion: MotionModel,
        seed: u64,
        graph: &G,
    ) -> VehicleResult<Self> {
        spec.validate()?;
        motion.validate()?;
        for hop in spec.route.windows(2) {
            graph.weight(hop[0], hop[1])?;
        }
        let edge_weight = graph.weight(spec.route[0], spec.route[1])?;
        Ok(Self {
            id,
            spec,
            motion,
            cursor: 0,
            progress: 0.0,
            speed: 0.0,
            edge_weight,
            finished: false,
            rng: VehicleRng::new(seed, id),
        })
    }

    /// Advance the vehicle by `delta` simulated seconds.
    ///
    /// # Errors
    ///
    /// `RouteExhausted` if the vehicle has already finished,
    /// `InvalidParameter` for a negative or non-finite `delta`, and `Graph`
    /// if the graph no longer contains a route hop.
    pub fn advance<G, S>(
        &mut self,
        delta: f64,
        graph: &G,
        roads: &RoadTable,
        signals: &S,
    ) -> VehicleResult<StepOutcome>
    where
        G: Graph + ?Sized,
        S: SignalLookup + ?Sized,
    {
        if self.finished {
            return Err(VehicleError::RouteExhausted(self.id));
        }
        if !(delta.is_finite() && delta >= 0.0) {
            return Err(VehicleError::InvalidParameter(format!(
                "delta must be finite and >= 0, got {delta}"
            )));
        }

        // Cross the intersection reached last tick, if the light allows.
        if self.progress >= self.edge_weight {
            if let Some(halt) = self.gate(graph, signals)? {
                self.speed = 0.0;
                return Ok(halt);
            }
            self.cursor += 1;
            self.progress = 0.0;
            self.edge_weight = graph.weight(self.spec.route[self.cursor], self.spec.route[self.cursor + 1])?;
        }

        let (from, to) = (self.spec.route[self.cursor], self.spec.route[self.cursor + 1]);
        let cap = self.spec.max_speed * roads.get(from, to).speed_factor;
        let current = self.speed.clamp(0.0, cap);
        self.speed = if self.rng.gen_bool(self.spec.misbehavior) {
            current * self.motion.brake_factor
        } else {
            cap.min(current + self.motion.acceleration * delta)
        };

        self.progress = (self.progress + self.speed * delta).min(self.edge_weight);
        if self.progress < self.edge_weight {
            return Ok(StepOutcome::Moved);
        }

        if self.cursor + 2 == self.spec.route.len() {
            self.cursor += 1;
            self.progress = 0.0;
            self.finished = true;
            return Ok(StepOutcome::Finished);
        }
        if let Some(halt) = self.gate(graph, signals)? {
            self.speed = 0.0;
            return Ok(halt);
        }
        Ok(StepOutcome::Arrived { at: to })
    }

    /// `Some(Halted)` if the light at the end of the current edge blocks the
    /// next one.  Only called when a next edge exists.
    fn gate<G, S>(&self, graph: &G, signals: &S) -> VehicleResult<Option<StepOutcome>>
    where
        G: Graph + ?Sized,
        S: SignalLookup + ?Sized,
    {
        let at = self.spec.route[self.cursor + 1];
        let next = self.spec.route[self.cursor + 2];
        let edge = graph.edge_id(at, next)?;
        Ok((!signals.is_open(at, edge)).then_some(StepOutcome::Halted { at, edge }))
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn spec(&self) -> &VehicleSpec {
        &self.spec
    }

    pub fn label(&self) -> &str {
        &self.spec.label
    }

    pub fn max_speed(&self) -> f64 {
        self.spec.max_speed
    }

    pub fn misbehavior(&self) -> f64 {
        self.spec.misbehavior
    }

    pub fn route(&self) -> &[VertexId] {
        &self.spec.route
    }

    /// Index into `route` of the vertex the current edge starts at.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Distance covered on the current edge.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// `progress / edge_weight`, in `[0, 1]`.  0 once finished.
    pub fn progress_fraction(&self) -> f64 {
        if self.finished { 0.0 } else { self.progress / self.edge_weight }
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Weight of the current edge.
    pub fn edge_weight(&self) -> f64 {
        self.edge_weight
    }

    /// The edge being driven, `None` once finished.
    pub fn current_edge(&self) -> Option<(VertexId, VertexId)> {
        if self.finished {
            None
        } else {
            Some((self.spec.route[self.cursor], self.spec.route[self.cursor + 1]))
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// `true` while stopped at an edge end.
    pub fn is_waiting(&self) -> bool {
        !self.finished && self.speed == 0.0 && self.progress >= self.edge_weight
    }
}

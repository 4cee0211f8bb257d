//! Fluent builder for constructing a [`Sim`].

use tsim_core::{SimClock, SimConfig, SparseIndex, VertexId};
use tsim_graph::{DijkstraRouter, Graph, RoadTable, Router};
use tsim_signal::SignalController;
use tsim_vehicle::MotionModel;

use crate::observer::EventBus;
use crate::sim::EngineState;
use crate::{Sim, SimError, SimResult, StopHandle};

/// Fluent builder for [`Sim<G>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: time step, horizon, seed, …
/// - `G: Graph`: the fully populated road graph
///
/// # Optional inputs (have defaults)
///
/// | Method                | Default                                  |
/// |-----------------------|------------------------------------------|
/// | `.lights(index)`      | No lights                                |
/// | `.roads(table)`       | Every road `RoadAttributes::default()`   |
/// | `.motion(model)`      | `MotionModel::default()` (instant accel) |
/// | `.router(r)`          | `DijkstraRouter`                         |
/// | `.auto_signals(p)`    | Off                                      |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, graph)
///     .lights(lights)
///     .roads(roads)
///     .build()?;
/// sim.add_car(VehicleSpec::new(100.0, 0.5, route))?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<G: Graph> {
    config:       SimConfig,
    graph:        G,
    lights:       SparseIndex<SignalController>,
    roads:        RoadTable,
    motion:       MotionModel,
    router:       Box<dyn Router>,
    auto_period:  Option<f64>,
}

impl<G: Graph> SimBuilder<G> {
    pub fn new(config: SimConfig, graph: G) -> Self {
        Self {
            config,
            graph,
            lights:      SparseIndex::new(),
            roads:       RoadTable::new(),
            motion:      MotionModel::default(),
            router:      Box::new(DijkstraRouter),
            auto_period: None,
        }
    }

    /// Lights keyed by the vertex they stand at.
    pub fn lights(mut self, lights: SparseIndex<SignalController>) -> Self {
        self.lights = lights;
        self
    }

    pub fn roads(mut self, roads: RoadTable) -> Self {
        self.roads = roads;
        self
    }

    pub fn motion(mut self, motion: MotionModel) -> Self {
        self.motion = motion;
        self
    }

    /// Routing algorithm behind [`Sim::plan_route`].
    pub fn router(mut self, router: impl Router + 'static) -> Self {
        self.router = Box::new(router);
        self
    }

    /// Give every busy intersection without a light a half-duty light.
    ///
    /// An intersection is busy when it has at least three outgoing
    /// neighbours.  Its light gets `period` and controls the edges towards
    /// the lower half of those neighbours (ascending by id).
    pub fn auto_signals(mut self, period: f64) -> Self {
        self.auto_period = Some(period);
        self
    }

    /// Validate inputs, place automatic lights, and return a ready-to-run
    /// [`Sim`].
    pub fn build(mut self) -> SimResult<Sim<G>> {
        self.config.validate()?;
        self.motion.validate()?;

        if let Some(period) = self.auto_period {
            self.place_auto_signals(period)?;
        }
        for (at, light) in self.lights.iter() {
            check_light(&self.graph, VertexId(at as u32), light)?;
        }
        for ((from, to), attrs) in self.roads.iter() {
            if !attrs.is_valid() {
                return Err(SimError::Config(format!(
                    "road {from}->{to} has speed_factor {} (must be in (0, 1])",
                    attrs.speed_factor
                )));
            }
        }

        Ok(Sim {
            config:       self.config,
            clock:        SimClock::new(),
            state:        EngineState::Configured,
            graph:        self.graph,
            lights:       self.lights,
            roads:        self.roads,
            motion:       self.motion,
            vehicles:     Vec::new(),
            next_vehicle: 0,
            bus:          EventBus::new(),
            stop:         StopHandle::new(),
            router:       self.router,
            last_wall:    None,
        })
    }

    fn place_auto_signals(&mut self, period: f64) -> SimResult<()> {
        for v in self.graph.vertices() {
            if self.lights.contains(v.index()) {
                continue;
            }
            let mut next = self.graph.neighbors(v)?;
            if next.len() < 3 {
                continue;
            }
            next.sort_unstable();
            let edges = next[..next.len() / 2]
                .iter()
                .map(|&n| self.graph.edge_id(v, n))
                .collect::<Result<Vec<_>, _>>()?;
            log::debug!("automatic light at {v} over edges {edges:?}");
            self.lights.set(v.index(), SignalController::new(0.5, period, edges)?);
        }
        Ok(())
    }
}

/// Every controlled edge must leave the light's own vertex.
fn check_light<G: Graph>(graph: &G, at: VertexId, light: &SignalController) -> SimResult<()> {
    let outgoing = graph
        .neighbors(at)?
        .into_iter()
        .map(|n| graph.edge_id(at, n))
        .collect::<Result<Vec<_>, _>>()?;
    match light.controlled().iter().find(|e| !outgoing.contains(e)) {
        Some(&edge) => Err(SimError::UnknownEdge { at, edge }),
        None => Ok(()),
    }
}

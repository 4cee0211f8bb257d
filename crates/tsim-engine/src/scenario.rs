//! TOML scenario files.
//!
//! ```toml
//! [sim]
//! seed = 7
//! horizon_secs = 600.0
//! time_step = { mode = "fixed", secs = 1.0 }
//!
//! [graph]
//! kind = "dense"            # optional; picked from the size otherwise
//! edges = [
//!     { from = 0, to = 1, weight = 1000.0 },
//!     { from = 1, to = 0, weight = 1000.0 },
//! ]
//!
//! [[lights]]
//! at = 1
//! duty_cycle = 0.5
//! period = 90.0
//! edges = [[1, 0]]
//! auto_adjust = false       # optional
//!
//! [[roads]]
//! from = 0
//! to = 1
//! label = "main"
//! speed_factor = 0.8
//!
//! [[cars]]
//! max_speed = 100.0
//! misbehavior = 0.1
//! route = [0, 1, 0]
//! label = "car1"
//! ```
//!
//! Edge endpoints are registered automatically; `graph.vertices` is only
//! needed for isolated vertices.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use tsim_core::{SimConfig, SparseIndex, VertexId};
use tsim_graph::{AnyGraph, Graph, GraphKind, RoadAttributes, RoadTable};
use tsim_signal::SignalController;
use tsim_vehicle::{MotionModel, VehicleSpec};

use crate::{Sim, SimBuilder, SimError, SimResult};

/// A complete, declarative simulation setup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    pub sim:    SimConfig,
    pub motion: MotionModel,
    pub graph:  GraphSpec,
    pub lights: Vec<LightSpec>,
    pub roads:  Vec<RoadSpec>,
    pub cars:   Vec<VehicleSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphSpec {
    /// Backing representation.  `None` lets [`AnyGraph::auto`] decide.
    pub kind: Option<GraphKind>,
    pub vertices: Vec<VertexId>,
    pub edges: Vec<EdgeSpec>,
    /// If set, busy intersections without a light get one with this period.
    pub auto_signals: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeSpec {
    pub from:   VertexId,
    pub to:     VertexId,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LightSpec {
    /// Intersection the light stands at.
    pub at: VertexId,
    pub duty_cycle: f64,
    pub period: f64,
    /// Controlled edges as `[from, to]` pairs; `from` must equal `at`.
    pub edges: Vec<(VertexId, VertexId)>,
    /// Starting position in the cycle, seconds.
    #[serde(default)]
    pub phase: f64,
    /// Give the other edges the opposite phase and tune `duty_cycle` from
    /// measured waits.
    #[serde(default)]
    pub auto_adjust: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoadSpec {
    pub from: VertexId,
    pub to:   VertexId,
    #[serde(default = "one")]
    pub width: f64,
    #[serde(default)]
    pub label: String,
    #[serde(default = "one")]
    pub speed_factor: f64,
}

fn one() -> f64 {
    1.0
}

impl Scenario {
    /// Read and parse a scenario file.
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let scenario = Self::from_toml_str(&text)?;
        log::info!(
            "loaded scenario {}: {} edges, {} lights, {} cars",
            path.as_ref().display(),
            scenario.graph.edges.len(),
            scenario.lights.len(),
            scenario.cars.len(),
        );
        Ok(scenario)
    }

    pub fn from_toml_str(text: &str) -> SimResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Build the graph, lights, roads, and engine, then add every car in
    /// file order.
    pub fn build(&self) -> SimResult<Sim<AnyGraph>> {
        let graph = self.build_graph()?;

        let mut lights = SparseIndex::new();
        for spec in &self.lights {
            let edges = spec
                .edges
                .iter()
                .map(|&(from, to)| graph.edge_id(from, to))
                .collect::<Result<Vec<_>, _>>()?;
            let light = SignalController::new(spec.duty_cycle, spec.period, edges)?
                .with_phase(spec.phase)
                .with_auto_adjust(spec.auto_adjust);
            if lights.set(spec.at.index(), light).is_some() {
                return Err(SimError::Config(format!("two lights at vertex {}", spec.at)));
            }
        }

        let roads: RoadTable = self
            .roads
            .iter()
            .map(|r| {
                let attrs = RoadAttributes::labelled(r.label.clone())
                    .with_width(r.width)
                    .with_speed_factor(r.speed_factor);
                ((r.from, r.to), attrs)
            })
            .collect();

        let mut builder = SimBuilder::new(self.sim.clone(), graph)
            .lights(lights)
            .roads(roads)
            .motion(self.motion);
        if let Some(period) = self.graph.auto_signals {
            builder = builder.auto_signals(period);
        }
        let mut sim = builder.build()?;
        for car in &self.cars {
            sim.add_car(car.clone())?;
        }
        Ok(sim)
    }

    fn build_graph(&self) -> SimResult<AnyGraph> {
        let mut ids: BTreeSet<VertexId> = self.graph.vertices.iter().copied().collect();
        for e in &self.graph.edges {
            ids.insert(e.from);
            ids.insert(e.to);
        }
        let mut graph = match self.graph.kind {
            Some(kind) => AnyGraph::new(kind),
            None => {
                let id_range = ids.last().map_or(0, |v| v.index() + 1);
                AnyGraph::auto(id_range, self.graph.edges.len())
            }
        };
        for v in ids {
            graph.add_vertex(v)?;
        }
        for e in &self.graph.edges {
            graph.add_edge(e.from, e.to, e.weight)?;
        }
        Ok(graph)
    }
}

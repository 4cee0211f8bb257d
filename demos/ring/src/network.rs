//! The built-in four-intersection network.
//!
//! ```text
//!        1000         1000
//!   0 ────────▶ 1 ────────▶ 2
//!   ▲ ╲                     ▲ │
//!   │  ╲______ 1400 "kar" __╱ │ 1000 (light at 2)
//!   │ 1000                    ▼
//!   └──────────────────────── 3
//! ```

use anyhow::Result;

use tsim_core::{EdgeId, SparseIndex, VertexId};
use tsim_graph::{AnyGraph, Graph, RoadAttributes, RoadTable};
use tsim_signal::SignalController;
use tsim_vehicle::VehicleSpec;

const EDGES: [(u32, u32, f64); 5] = [
    (0, 1, 1000.0),
    (0, 2, 1400.0),
    (1, 2, 1000.0),
    (2, 3, 1000.0),
    (3, 0, 1000.0),
];

pub fn build_graph() -> Result<AnyGraph> {
    let mut graph = AnyGraph::auto(4, EDGES.len());
    for v in 0..4 {
        graph.add_vertex(VertexId(v))?;
    }
    for (from, to, weight) in EDGES {
        graph.add_edge(VertexId(from), VertexId(to), weight)?;
    }
    Ok(graph)
}

/// Half-duty light at 2 with a 90 s cycle, gating the road towards 3.
pub fn build_lights(graph: &AnyGraph) -> Result<SparseIndex<SignalController>> {
    let towards_3: EdgeId = graph.edge_id(VertexId(2), VertexId(3))?;
    let mut lights = SparseIndex::new();
    lights.set(2, SignalController::new(0.5, 90.0, [towards_3])?);
    Ok(lights)
}

/// The shortcut 0 → 2 is a poor road: half speed.
pub fn build_roads() -> RoadTable {
    let mut roads = RoadTable::new();
    roads.insert(VertexId(0), VertexId(2), RoadAttributes::labelled("kar").with_speed_factor(0.5));
    roads
}

pub fn cars() -> Vec<VehicleSpec> {
    let route = |ids: &[u32]| ids.iter().copied().map(VertexId).collect::<Vec<_>>();
    vec![
        VehicleSpec::new(100.0, 0.5, route(&[0, 1, 2, 3, 0, 1, 2, 3])).labelled("car1"),
        VehicleSpec::new(90.0, 0.7, route(&[0, 2, 3, 0, 2, 3])).labelled("car2"),
    ]
}

//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! `tsim-engine` plans routes through the [`Router`] trait, so applications
//! can swap in A* or a congestion-aware model without touching the engine.
//!
//! # Cost units
//!
//! Costs are raw edge weights, i.e. the same length unit vehicles advance
//! `progress` in.  Road speed factors are ignored.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use tsim_core::VertexId;

use crate::{Graph, GraphError, GraphResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Vertices to visit in order, source first, destination last.
    pub vertices: Vec<VertexId>,
    /// Sum of the traversed edge weights.
    pub total_weight: f64,
}

impl Route {
    /// `true` if the source and destination are the same vertex.
    pub fn is_trivial(&self) -> bool {
        self.vertices.len() < 2
    }

    /// Number of edges traversed.
    pub fn hops(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
pub trait Router {
    /// Compute a route from `from` to `to`.
    ///
    /// `from == to` yields a trivial single-vertex route, not an error.
    ///
    /// # Errors
    ///
    /// `UnknownVertex` if either endpoint is unregistered, `NoRoute` if `to`
    /// is unreachable.
    fn route(&self, graph: &dyn Graph, from: VertexId, to: VertexId) -> GraphResult<Route>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra over any [`Graph`].
///
/// Ties are broken by the smaller vertex id, so equal-cost alternatives
/// always resolve the same way regardless of backing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &dyn Graph, from: VertexId, to: VertexId) -> GraphResult<Route> {
        dijkstra(graph, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn dijkstra(graph: &dyn Graph, from: VertexId, to: VertexId) -> GraphResult<Route> {
    for v in [from, to] {
        if !graph.has_vertex(v) {
            return Err(GraphError::UnknownVertex(v));
        }
    }
    if from == to {
        return Ok(Route { vertices: vec![from], total_weight: 0.0 });
    }

    // Ids index these directly; the largest registered id bounds the size.
    let n = graph.vertices().last().map_or(0, |v| v.index() + 1);
    let mut dist = vec![f64::INFINITY; n];
    // prev[v] = vertex that reached v; INVALID for unreached vertices.
    let mut prev = vec![VertexId::INVALID; n];

    dist[from.index()] = 0.0;

    // Min-heap: (cost, vertex).  Reverse turns BinaryHeap (max) into a
    // min-heap; VertexId as secondary key gives deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, VertexId)>> = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(0.0), from)));

    while let Some(Reverse((OrderedFloat(cost), v))) = heap.pop() {
        if v == to {
            return Ok(reconstruct(&prev, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[v.index()] {
            continue;
        }

        let mut next = graph.neighbors(v)?;
        next.sort_unstable();
        for u in next {
            let new_cost = cost + graph.weight(v, u)?;
            if new_cost < dist[u.index()] {
                dist[u.index()] = new_cost;
                prev[u.index()] = v;
                heap.push(Reverse((OrderedFloat(new_cost), u)));
            }
        }
    }

    Err(GraphError::NoRoute { from, to })
}

fn reconstruct(prev: &[VertexId], from: VertexId, to: VertexId, total_weight: f64) -> Route {
    let mut vertices = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur.index()];
        vertices.push(cur);
    }
    vertices.reverse();
    Route { vertices, total_weight }
}

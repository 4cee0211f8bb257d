//! The `Graph` query contract and the runtime-selected `AnyGraph`.
//!
//! # Contract
//!
//! Every backing must give identical answers to `vertices`, `neighbors` (as a
//! set), `weight`, and `edge_id` for the same sequence of mutating calls.
//! Neighbor *order* is representation-specific and callers must not depend on
//! it.
//!
//! Edge ids are handed out in first-insertion order of each distinct
//! `(from, to)` pair.  Re-adding a pair overwrites its weight and keeps its
//! id; removing it retires the id for good.

use tsim_core::{EdgeId, VertexId};

use crate::{DenseGraph, GraphError, GraphResult, SparseGraph};

/// Directed, weighted, integer-labelled road graph.
pub trait Graph {
    /// Which backing answers the queries.
    fn kind(&self) -> GraphKind;

    /// Register `v`.  Idempotent.
    ///
    /// # Errors
    ///
    /// `CapacityExceeded` if the backing cannot index `v`.
    fn add_vertex(&mut self, v: VertexId) -> GraphResult<()>;

    fn has_vertex(&self, v: VertexId) -> bool;

    /// Add (or overwrite) the directed edge `from → to`.
    ///
    /// # Errors
    ///
    /// `UnknownVertex` if either endpoint is unregistered (checked `from`
    /// first); `InvalidWeight` unless `weight` is finite and `> 0`.
    fn add_edge(&mut self, from: VertexId, to: VertexId, weight: f64) -> GraphResult<EdgeId>;

    /// Unregister `v` and drop every edge touching it.  `false` if `v` was
    /// not registered.
    fn remove_vertex(&mut self, v: VertexId) -> bool;

    /// Drop `from → to`.  `false` if there was no such edge.
    fn remove_edge(&mut self, from: VertexId, to: VertexId) -> bool;

    /// Registered vertices, ascending.
    fn vertices(&self) -> Vec<VertexId>;

    /// Vertices reachable from `v` over one outgoing edge.
    fn neighbors(&self, v: VertexId) -> GraphResult<Vec<VertexId>>;

    /// Weight of `from → to`.
    ///
    /// # Errors
    ///
    /// `UnknownVertex` if `from` is unregistered, `NoSuchEdge` otherwise when
    /// the edge is missing.
    fn weight(&self, from: VertexId, to: VertexId) -> GraphResult<f64>;

    /// Stable id of `from → to`.  Same errors as [`weight`](Self::weight).
    fn edge_id(&self, from: VertexId, to: VertexId) -> GraphResult<EdgeId>;

    /// Every edge as `(from, to, weight)`.
    fn edges(&self) -> Vec<(VertexId, VertexId, f64)>;

    fn vertex_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    /// Drop every vertex and edge.  Edge ids restart from 0.
    fn clear(&mut self);
}

/// Reject weights the motion model cannot work with.
pub(crate) fn check_weight(from: VertexId, to: VertexId, weight: f64) -> GraphResult<()> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(GraphError::InvalidWeight { from, to, weight })
    }
}

// ── GraphKind ─────────────────────────────────────────────────────────────────

/// Backing representation of a graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GraphKind {
    /// Adjacency matrix: O(1) edge lookup, O(V²) memory.
    Dense,
    /// Adjacency lists: O(degree) edge lookup, O(V + E) memory.
    Sparse,
}

// ── AnyGraph ──────────────────────────────────────────────────────────────────

/// A graph whose backing is chosen at construction time.
#[derive(Debug, Clone)]
pub enum AnyGraph {
    Dense(DenseGraph),
    Sparse(SparseGraph),
}

impl AnyGraph {
    /// An empty graph of the requested kind.
    pub fn new(kind: GraphKind) -> Self {
        match kind {
            GraphKind::Dense => AnyGraph::Dense(DenseGraph::new()),
            GraphKind::Sparse => AnyGraph::Sparse(SparseGraph::new()),
        }
    }

    /// Pick the cheaper backing for the expected size.
    ///
    /// `id_range` is one past the largest vertex id, which is what the
    /// matrix is sized by; for ids `0..n` it equals the vertex count.  The
    /// matrix wastes memory only when the id range is large *and* the edge
    /// set is far from complete, so it is used whenever the range is below
    /// 500 or there are at least `R × (R − 100)` edges, and never past
    /// [`DenseGraph::MAX_SIDE`].
    pub fn auto(id_range: usize, edge_count: usize) -> Self {
        match Self::recommended_kind(id_range, edge_count) {
            GraphKind::Dense => AnyGraph::Dense(DenseGraph::with_capacity(id_range)),
            GraphKind::Sparse => AnyGraph::Sparse(SparseGraph::new()),
        }
    }

    pub fn recommended_kind(id_range: usize, edge_count: usize) -> GraphKind {
        let near_complete = edge_count >= id_range.saturating_mul(id_range.saturating_sub(100));
        if id_range <= DenseGraph::MAX_SIDE && (id_range < 500 || near_complete) {
            GraphKind::Dense
        } else {
            GraphKind::Sparse
        }
    }
}

macro_rules! delegate {
    ($self:ident, $g:ident => $body:expr) => {
        match $self {
            AnyGraph::Dense($g) => $body,
            AnyGraph::Sparse($g) => $body,
        }
    };
}

impl Graph for AnyGraph {
    fn kind(&self) -> GraphKind {
        delegate!(self, g => g.kind())
    }

    fn add_vertex(&mut self, v: VertexId) -> GraphResult<()> {
        delegate!(self, g => g.add_vertex(v))
    }

    fn has_vertex(&self, v: VertexId) -> bool {
        delegate!(self, g => g.has_vertex(v))
    }

    fn add_edge(&mut self, from: VertexId, to: VertexId, weight: f64) -> GraphResult<EdgeId> {
        delegate!(self, g => g.add_edge(from, to, weight))
    }

    fn remove_vertex(&mut self, v: VertexId) -> bool {
        delegate!(self, g => g.remove_vertex(v))
    }

    fn remove_edge(&mut self, from: VertexId, to: VertexId) -> bool {
        delegate!(self, g => g.remove_edge(from, to))
    }

    fn vertices(&self) -> Vec<VertexId> {
        delegate!(self, g => g.vertices())
    }

    fn neighbors(&self, v: VertexId) -> GraphResult<Vec<VertexId>> {
        delegate!(self, g => g.neighbors(v))
    }

    fn weight(&self, from: VertexId, to: VertexId) -> GraphResult<f64> {
        delegate!(self, g => g.weight(from, to))
    }

    fn edge_id(&self, from: VertexId, to: VertexId) -> GraphResult<EdgeId> {
        delegate!(self, g => g.edge_id(from, to))
    }

    fn edges(&self) -> Vec<(VertexId, VertexId, f64)> {
        delegate!(self, g => g.edges())
    }

    fn vertex_count(&self) -> usize {
        delegate!(self, g => g.vertex_count())
    }

    fn edge_count(&self) -> usize {
        delegate!(self, g => g.edge_count())
    }

    fn clear(&mut self) {
        delegate!(self, g => g.clear())
    }
}

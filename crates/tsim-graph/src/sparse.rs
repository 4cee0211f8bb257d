//! Adjacency-list backing.
//!
//! Each registered vertex owns a `Vec` of outgoing edges in insertion order,
//! stored in a [`SparseIndex`] keyed by vertex id.  Edge lookup is a linear
//! scan of the source's list, which stays short on road networks.

use tsim_core::{EdgeId, SparseIndex, VertexId};

use crate::graph::check_weight;
use crate::{Graph, GraphError, GraphKind, GraphResult};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Adjacent {
    to:     VertexId,
    weight: f64,
    id:     EdgeId,
}

/// Sparse directed graph.
#[derive(Debug, Clone, Default)]
pub struct SparseGraph {
    adjacency:    SparseIndex<Vec<Adjacent>>,
    vertex_count: usize,
    edge_count:   usize,
    next_edge:    u32,
}

impl SparseGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn find(&self, from: VertexId, to: VertexId) -> GraphResult<&Adjacent> {
        let list = self.adjacency.get(from.index()).ok_or(GraphError::UnknownVertex(from))?;
        list.iter().find(|a| a.to == to).ok_or(GraphError::NoSuchEdge { from, to })
    }
}

impl Graph for SparseGraph {
    fn kind(&self) -> GraphKind {
        GraphKind::Sparse
    }

    fn add_vertex(&mut self, v: VertexId) -> GraphResult<()> {
        if !self.adjacency.contains(v.index()) {
            self.adjacency.set(v.index(), Vec::new());
            self.vertex_count += 1;
        }
        Ok(())
    }

    #[inline]
    fn has_vertex(&self, v: VertexId) -> bool {
        self.adjacency.contains(v.index())
    }

    fn add_edge(&mut self, from: VertexId, to: VertexId, weight: f64) -> GraphResult<EdgeId> {
        if !self.has_vertex(to) {
            // `from` is reported first when both are missing.
            if !self.has_vertex(from) {
                return Err(GraphError::UnknownVertex(from));
            }
            return Err(GraphError::UnknownVertex(to));
        }
        check_weight(from, to, weight)?;
        let list = self
            .adjacency
            .get_mut(from.index())
            .ok_or(GraphError::UnknownVertex(from))?;

        if let Some(existing) = list.iter_mut().find(|a| a.to == to) {
            existing.weight = weight;
            return Ok(existing.id);
        }
        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        self.edge_count += 1;
        list.push(Adjacent { to, weight, id });
        Ok(id)
    }

    fn remove_vertex(&mut self, v: VertexId) -> bool {
        let Some(out) = self.adjacency.remove(v.index()) else {
            return false;
        };
        self.edge_count -= out.len();
        for (_, list) in self.adjacency.iter_mut() {
            let before = list.len();
            list.retain(|a| a.to != v);
            self.edge_count -= before - list.len();
        }
        self.vertex_count -= 1;
        true
    }

    fn remove_edge(&mut self, from: VertexId, to: VertexId) -> bool {
        let Some(list) = self.adjacency.get_mut(from.index()) else {
            return false;
        };
        match list.iter().position(|a| a.to == to) {
            Some(i) => {
                list.remove(i);
                self.edge_count -= 1;
                true
            }
            None => false,
        }
    }

    fn vertices(&self) -> Vec<VertexId> {
        self.adjacency.keys().map(|k| VertexId(k as u32)).collect()
    }

    fn neighbors(&self, v: VertexId) -> GraphResult<Vec<VertexId>> {
        let list = self.adjacency.get(v.index()).ok_or(GraphError::UnknownVertex(v))?;
        Ok(list.iter().map(|a| a.to).collect())
    }

    fn weight(&self, from: VertexId, to: VertexId) -> GraphResult<f64> {
        self.find(from, to).map(|a| a.weight)
    }

    fn edge_id(&self, from: VertexId, to: VertexId) -> GraphResult<EdgeId> {
        self.find(from, to).map(|a| a.id)
    }

    fn edges(&self) -> Vec<(VertexId, VertexId, f64)> {
        self.adjacency
            .iter()
            .flat_map(|(k, list)| list.iter().map(move |a| (VertexId(k as u32), a.to, a.weight)))
            .collect()
    }

    fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

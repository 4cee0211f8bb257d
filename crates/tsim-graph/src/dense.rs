//! Adjacency-matrix backing.
//!
//! # Data layout
//!
//! A `side × side` row-major matrix of `Option<Cell>`; the edge `from → to`
//! lives at `cells[from * side + to]`.  Registering a vertex id `>= side`
//! re-lays the matrix out at `max(id + 1, 2 × side)`.
//!
//! | Operation      | Cost   |
//! |----------------|--------|
//! | `add_edge`     | O(1)   |
//! | `weight`       | O(1)   |
//! | `neighbors`    | O(V)   |
//! | `remove_vertex`| O(V)   |
//! | memory         | O(V²)  |
//!
//! Ids index the matrix directly, so the id space is capped at
//! [`DenseGraph::MAX_SIDE`]; registering a larger id is a
//! `CapacityExceeded` error.

use tsim_core::{EdgeId, VertexId};

use crate::graph::check_weight;
use crate::{Graph, GraphError, GraphKind, GraphResult};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    weight: f64,
    id:     EdgeId,
}

/// Dense directed graph.
#[derive(Debug, Clone, Default)]
pub struct DenseGraph {
    side:         usize,
    registered:   Vec<bool>,
    cells:        Vec<Option<Cell>>,
    vertex_count: usize,
    edge_count:   usize,
    next_edge:    u32,
}

impl DenseGraph {
    /// Largest matrix side; vertex ids must be below it.
    pub const MAX_SIDE: usize = 1 << 12;

    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the matrix for vertex ids `0..side`, capped at
    /// [`MAX_SIDE`](Self::MAX_SIDE).
    pub fn with_capacity(side: usize) -> Self {
        let side = side.min(Self::MAX_SIDE);
        Self {
            side,
            registered: vec![false; side],
            cells: vec![None; side * side],
            ..Self::default()
        }
    }

    /// Current matrix side length (ids `0..side` fit without re-layout).
    pub fn capacity(&self) -> usize {
        self.side
    }

    #[inline]
    fn slot(&self, from: VertexId, to: VertexId) -> Option<usize> {
        let (r, c) = (from.index(), to.index());
        (r < self.side && c < self.side).then(|| r * self.side + c)
    }

    fn cell(&self, from: VertexId, to: VertexId) -> GraphResult<Cell> {
        if !self.has_vertex(from) {
            return Err(GraphError::UnknownVertex(from));
        }
        self.slot(from, to)
            .and_then(|i| self.cells[i])
            .ok_or(GraphError::NoSuchEdge { from, to })
    }

    /// Re-lay the matrix out with room for ids `0..min_side`.
    fn grow(&mut self, min_side: usize) -> GraphResult<()> {
        let new_side = min_side.max(self.side.saturating_mul(2)).min(Self::MAX_SIDE);
        let len = new_side
            .checked_mul(new_side)
            .filter(|_| min_side <= new_side)
            .ok_or(GraphError::CapacityExceeded { limit: Self::MAX_SIDE })?;
        let mut cells = vec![None; len];
        for r in 0..self.side {
            let old_row = &self.cells[r * self.side..(r + 1) * self.side];
            cells[r * new_side..r * new_side + self.side].copy_from_slice(old_row);
        }
        self.cells = cells;
        self.registered.resize(new_side, false);
        self.side = new_side;
        Ok(())
    }
}

impl Graph for DenseGraph {
    fn kind(&self) -> GraphKind {
        GraphKind::Dense
    }

    fn add_vertex(&mut self, v: VertexId) -> GraphResult<()> {
        if v.index() >= Self::MAX_SIDE {
            return Err(GraphError::CapacityExceeded { limit: Self::MAX_SIDE });
        }
        if v.index() >= self.side {
            self.grow(v.index() + 1)?;
        }
        if !self.registered[v.index()] {
            self.registered[v.index()] = true;
            self.vertex_count += 1;
        }
        Ok(())
    }

    #[inline]
    fn has_vertex(&self, v: VertexId) -> bool {
        self.registered.get(v.index()).copied().unwrap_or(false)
    }

    fn add_edge(&mut self, from: VertexId, to: VertexId, weight: f64) -> GraphResult<EdgeId> {
        if !self.has_vertex(from) {
            return Err(GraphError::UnknownVertex(from));
        }
        if !self.has_vertex(to) {
            return Err(GraphError::UnknownVertex(to));
        }
        check_weight(from, to, weight)?;

        // Both endpoints are registered, so both are < side.
        let i = from.index() * self.side + to.index();
        match &mut self.cells[i] {
            Some(cell) => {
                cell.weight = weight;
                Ok(cell.id)
            }
            empty => {
                let id = EdgeId(self.next_edge);
                self.next_edge += 1;
                self.edge_count += 1;
                *empty = Some(Cell { weight, id });
                Ok(id)
            }
        }
    }

    fn remove_vertex(&mut self, v: VertexId) -> bool {
        if !self.has_vertex(v) {
            return false;
        }
        let x = v.index();
        for k in 0..self.side {
            for i in [x * self.side + k, k * self.side + x] {
                if self.cells[i].take().is_some() {
                    self.edge_count -= 1;
                }
            }
        }
        self.registered[x] = false;
        self.vertex_count -= 1;
        true
    }

    fn remove_edge(&mut self, from: VertexId, to: VertexId) -> bool {
        if !self.has_vertex(from) || !self.has_vertex(to) {
            return false;
        }
        match self.slot(from, to).and_then(|i| self.cells[i].take()) {
            Some(_) => {
                self.edge_count -= 1;
                true
            }
            None => false,
        }
    }

    fn vertices(&self) -> Vec<VertexId> {
        self.registered
            .iter()
            .enumerate()
            .filter(|&(_, &r)| r)
            .map(|(i, _)| VertexId(i as u32))
            .collect()
    }

    fn neighbors(&self, v: VertexId) -> GraphResult<Vec<VertexId>> {
        if !self.has_vertex(v) {
            return Err(GraphError::UnknownVertex(v));
        }
        let row = &self.cells[v.index() * self.side..(v.index() + 1) * self.side];
        Ok(row
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_some())
            .map(|(i, _)| VertexId(i as u32))
            .collect())
    }

    fn weight(&self, from: VertexId, to: VertexId) -> GraphResult<f64> {
        self.cell(from, to).map(|c| c.weight)
    }

    fn edge_id(&self, from: VertexId, to: VertexId) -> GraphResult<EdgeId> {
        self.cell(from, to).map(|c| c.id)
    }

    fn edges(&self) -> Vec<(VertexId, VertexId, f64)> {
        let mut out = Vec::with_capacity(self.edge_count);
        for (i, cell) in self.cells.iter().enumerate() {
            if let Some(c) = cell {
                let from = VertexId((i / self.side) as u32);
                let to = VertexId((i % self.side) as u32);
                out.push((from, to, c.weight));
            }
        }
        out
    }

    fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn clear(&mut self) {
        *self = Self::with_capacity(self.side);
    }
}

//! Binary topology exchange format.
//!
//! ```text
//! "TSG"  u8 version=0
//! u32    vertex count
//! per vertex (ascending id):
//!     u32 id   u32 degree
//!     per neighbor (ascending id):  u32 id  f64 weight
//! ```
//!
//! All integers and floats are big-endian.  Edge ids are not stored: decoding
//! re-assigns them in file order.

use tsim_core::VertexId;

use crate::{Graph, GraphError, GraphResult};

const MAGIC: &[u8; 3] = b"TSG";
const VERSION: u8 = 0;

/// Serialise the vertices and edges of `graph`.
pub fn encode<G: Graph + ?Sized>(graph: &G) -> GraphResult<Vec<u8>> {
    let vertices = graph.vertices();
    let mut out = Vec::with_capacity(8 + vertices.len() * 8 + graph.edge_count() * 12);
    out.extend_from_slice(MAGIC);
    out.push(VERSION);
    out.extend_from_slice(&len_u32(vertices.len())?.to_be_bytes());

    for v in vertices {
        let mut next = graph.neighbors(v)?;
        next.sort_unstable();
        out.extend_from_slice(&v.0.to_be_bytes());
        out.extend_from_slice(&len_u32(next.len())?.to_be_bytes());
        for u in next {
            out.extend_from_slice(&u.0.to_be_bytes());
            out.extend_from_slice(&graph.weight(v, u)?.to_be_bytes());
        }
    }
    Ok(out)
}

/// Replace the contents of `graph` with the topology in `bytes`.
///
/// On error the graph is left cleared or partially filled.
pub fn decode_into<G: Graph + ?Sized>(graph: &mut G, bytes: &[u8]) -> GraphResult<()> {
    graph.clear();
    let mut r = Reader { bytes, pos: 0 };

    if r.take(3)? != MAGIC {
        return Err(GraphError::Codec("bad magic".into()));
    }
    let version = r.take(1)?[0];
    if version != VERSION {
        return Err(GraphError::Codec(format!("unsupported version {version}")));
    }

    // Vertices first, so edges may point forward in the file.
    let count = r.u32()?;
    let mut pending = Vec::new();
    for _ in 0..count {
        let v = VertexId(r.u32()?);
        graph.add_vertex(v)?;
        let degree = r.u32()?;
        for _ in 0..degree {
            let u = VertexId(r.u32()?);
            let w = r.f64()?;
            pending.push((v, u, w));
        }
    }
    if r.pos != bytes.len() {
        return Err(GraphError::Codec(format!("{} trailing bytes", bytes.len() - r.pos)));
    }
    for (v, u, w) in pending {
        graph.add_edge(v, u, w)?;
    }
    Ok(())
}

fn len_u32(n: usize) -> GraphResult<u32> {
    u32::try_from(n).map_err(|_| GraphError::Codec(format!("count {n} exceeds u32")))
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos:   usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> GraphResult<&'a [u8]> {
        let end = self.pos + n;
        let slice = self
            .bytes
            .get(self.pos..end)
            .ok_or_else(|| GraphError::Codec(format!("truncated at byte {}", self.pos)))?;
        self.pos = end;
        Ok(slice)
    }

    fn u32(&mut self) -> GraphResult<u32> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.take(4)?);
        Ok(u32::from_be_bytes(buf))
    }

    fn f64(&mut self) -> GraphResult<f64> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8)?);
        Ok(f64::from_be_bytes(buf))
    }
}

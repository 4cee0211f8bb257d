//! `tsim-graph`: road network, road attributes, and routing.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`graph`]  | `Graph` trait, `AnyGraph`, `GraphKind`                        |
//! | [`dense`]  | `DenseGraph`: adjacency matrix                               |
//! | [`sparse`] | `SparseGraph`: adjacency lists                               |
//! | [`road`]   | `RoadAttributes`, `RoadTable`                                 |
//! | [`router`] | `Router` trait, `Route`, `DijkstraRouter`                     |
//! | [`codec`]  | Binary topology encode/decode                                 |
//! | [`error`]  | `GraphError`, `GraphResult<T>`                                |
//!
//! # Choosing a backing
//!
//! Both backings answer every query identically; they differ only in cost.
//! `DenseGraph` is the better choice for small or nearly complete id spaces,
//! `SparseGraph` for large sparse ones.  [`AnyGraph::auto`] picks for you.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod codec;
pub mod dense;
pub mod error;
pub mod graph;
pub mod road;
pub mod router;
pub mod sparse;


pub use dense::DenseGraph;
pub use error::{GraphError, GraphResult};
pub use graph::{AnyGraph, Graph, GraphKind};
pub use road::{RoadAttributes, RoadTable};
pub use router::{DijkstraRouter, Route, Router};
pub use sparse::SparseGraph;

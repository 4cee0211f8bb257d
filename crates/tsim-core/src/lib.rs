//! `tsim-core`: foundational types for the `tsim` traffic simulator.
//!
//! This crate is a dependency of every other `tsim-*` crate.  It has no
//! `tsim-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `VertexId`, `EdgeId`, `VehicleId`                         |
//! | [`index`]   | `SparseIndex<V>`: unbounded, lazily grown slot store     |
//! | [`time`]    | `Tick`, `SimClock`, `SimConfig`, `TimeStep`               |
//! | [`rng`]     | `VehicleRng` (per-vehicle), `SimRng` (global)             |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and `SimConfig`.     |

pub mod error;
pub mod ids;
pub mod index;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{EdgeId, VehicleId, VertexId};
pub use index::SparseIndex;
pub use rng::{SimRng, VehicleRng};
pub use time::{SimClock, SimConfig, Tick, TimeStep};

//! `tsim-vehicle`: per-vehicle motion along a fixed route.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`spec`]    | `VehicleSpec` (what to drive), `MotionModel` (how to drive)  |
//! | [`vehicle`] | `Vehicle` state machine, `StepOutcome`                       |
//! | [`error`]   | `VehicleError`, `VehicleResult<T>`                           |
//!
//! # Motion model
//!
//! A vehicle covers `speed × delta` of its current edge per tick and stops
//! exactly at the edge end; surplus distance is dropped.  It crosses the
//! intersection at the start of the *next* tick, and only if the light at
//! that intersection lets it onto the following edge.  A closed light holds
//! it at the boundary with speed 0.
//!
//! Speed is recomputed every tick from one draw of the vehicle's own RNG:
//! with probability `misbehavior` the driver brakes (`speed × brake_factor`),
//! otherwise it accelerates toward `max_speed × speed_factor` of the road.
//! The default [`MotionModel`] accelerates instantly, so a well-behaved
//! vehicle drives at its cap from the first tick.

pub mod error;
pub mod spec;
pub mod vehicle;


pub use error::{VehicleError, VehicleResult};
pub use spec::{MotionModel, VehicleSpec};
pub use vehicle::{StepOutcome, Vehicle};

//! `tsim-engine`: tick loop orchestrator for the tsim traffic simulator.
//!
//! # Tick loop
//!
//! ```text
//! until a stop condition holds:
//!   ① Delta   : fixed step, wall-clock measurement, or caller-supplied.
//!   ② Lights  : every SignalController advances by delta (ascending vertex).
//!   ③ Vehicles: every active Vehicle advances (insertion order), gated by
//!                the light at the intersection it is about to leave.
//!   ④ Prune   : halted time is credited to lights; finished vehicles drop.
//!   ⑤ Notify  : "update" handlers, then SimObserver hooks.
//! ```
//!
//! Vehicles never mutate lights during phase ③, so every vehicle in a tick
//! sees the same post-② signal state.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tsim_engine::{NoopObserver, SimBuilder};
//! use tsim_vehicle::VehicleSpec;
//!
//! let mut sim = SimBuilder::new(config, graph).lights(lights).build()?;
//! sim.add_car(VehicleSpec::new(100.0, 0.0, route).labelled("car1"))?;
//! sim.on("update", |ev| println!("{} cars", ev.view.vehicles.len()));
//! sim.run(&mut NoopObserver)?;
//! ```
//!
//! Or declaratively with [`Scenario::load`].

pub mod builder;
pub mod dump;
pub mod error;
pub mod observer;
pub mod scenario;
pub mod sim;
pub mod stop;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{EventBus, NoopObserver, SimObserver, SimView, TickSummary, UPDATE, UpdateEvent};
pub use scenario::{EdgeSpec, GraphSpec, LightSpec, RoadSpec, Scenario};
pub use sim::{EngineState, Sim, StopReason};
pub use stop::StopHandle;

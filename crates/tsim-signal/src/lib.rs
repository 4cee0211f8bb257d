//! `tsim-signal`: periodic signal controllers that gate entry onto edges.
//!
//! A [`SignalController`] stands at one intersection and cycles between
//! `Open` and `Closed`.  It only gates the edges in its controlled set;
//! every other edge leaving that intersection is always passable, unless
//! the controller auto-adjusts, in which case those edges get the opposite
//! phase and the duty cycle follows the measured waiting time.
//!
//! Controllers are stored in a `SparseIndex<SignalController>` keyed by the
//! vertex they stand at.  Vehicles query that index through the
//! [`SignalLookup`] trait, which treats a missing controller as open.

pub mod controller;
pub mod error;


pub use controller::{GateState, SignalController, SignalLookup};
pub use error::{SignalError, SignalResult};

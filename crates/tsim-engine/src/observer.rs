//! Per-tick notification: named event handlers and the `SimObserver` trait.
//!
//! Two channels exist:
//!
//! - [`EventBus`] holds closures registered by name through
//!   [`Sim::on`](crate::Sim::on).  Only [`UPDATE`] is ever emitted; other
//!   names are accepted and stay silent.
//! - [`SimObserver`] is passed to [`Sim::run`](crate::Sim::run) for
//!   structured collection (e.g. the CSV writer in `tsim-output`).
//!
//! Both receive read-only views, so neither can mutate the engine mid-tick.

use std::collections::HashMap;

use tsim_core::{SparseIndex, Tick};
use tsim_graph::RoadTable;
use tsim_signal::SignalController;
use tsim_vehicle::Vehicle;

/// The only event name the engine emits.
pub const UPDATE: &str = "update";

// ── Views ─────────────────────────────────────────────────────────────────────

/// Read-only snapshot of the mutable simulation state after a tick.
#[derive(Debug, Clone, Copy)]
pub struct SimView<'a> {
    /// Active vehicles in processing order.  Finished ones are already gone.
    pub vehicles: &'a [Vehicle],
    /// Lights keyed by the vertex they stand at.
    pub lights: &'a SparseIndex<SignalController>,
    pub roads: &'a RoadTable,
}

/// Payload of the [`UPDATE`] event.
#[derive(Debug, Clone, Copy)]
pub struct UpdateEvent<'a> {
    /// The tick just processed.
    pub tick: Tick,
    /// Simulated seconds the tick lasted.
    pub delta: f64,
    /// Simulated seconds elapsed including this tick.
    pub elapsed_secs: f64,
    pub view: SimView<'a>,
}

/// Counts collected while processing one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickSummary {
    pub tick:         Tick,
    pub delta:        f64,
    pub elapsed_secs: f64,
    /// Vehicles still active after pruning.
    pub active:   usize,
    pub moved:    usize,
    pub arrived:  usize,
    pub halted:   usize,
    pub finished: usize,
}

// ── EventBus ──────────────────────────────────────────────────────────────────

/// A registered handler.
pub type UpdateHandler = Box<dyn FnMut(&UpdateEvent<'_>)>;

/// Handlers keyed by event name, each list in registration order.
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<String, Vec<UpdateHandler>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, event: impl Into<String>, handler: UpdateHandler) {
        self.handlers.entry(event.into()).or_default().push(handler);
    }

    /// Call every handler registered under `event`, oldest first.
    pub fn emit(&mut self, event: &str, payload: &UpdateEvent<'_>) {
        if let Some(list) = self.handlers.get_mut(event) {
            for handler in list.iter_mut() {
                handler(payload);
            }
        }
    }

    /// Number of handlers registered under `event`.
    pub fn count(&self, event: &str) -> usize {
        self.handlers.get(event).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.handlers.iter().map(|(k, v)| (k.as_str(), v.len())).collect();
        names.sort_unstable();
        f.debug_struct("EventBus").field("handlers", &names).finish()
    }
}

// ── SimObserver ───────────────────────────────────────────────────────────────

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
///         if tick.0 % self.interval == 0 {
///             println!("{tick}: {} vehicles on the road", summary.active);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after update handlers have run.
    fn on_tick_end(&mut self, _tick: Tick, _summary: &TickSummary) {}

    /// Called every `config.output_interval_ticks` ticks with the post-tick
    /// state.
    fn on_snapshot(&mut self, _tick: Tick, _view: &SimView<'_>) {}

    /// Called once when [`Sim::run`](crate::Sim::run) stops or
    /// [`Sim::run_ticks`](crate::Sim::run_ticks) finishes its batch.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

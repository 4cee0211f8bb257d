//! Simulation time model.
//!
//! # Design
//!
//! Time advances in discrete ticks, but unlike a fixed-resolution calendar
//! every tick carries its own `delta` in simulated seconds: either the fixed
//! configured step or a wall-clock measurement.  `SimClock` therefore keeps
//! both the integer tick counter (for ordering and output intervals) and the
//! accumulated simulated seconds (for the horizon).

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// Ordinal of a processed tick, starting at 0.
///
/// Ticks have no fixed length, so a `Tick` orders events and drives the
/// snapshot interval but says nothing about simulated time on its own.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Tick(pub u64);

impl Tick {
    /// The tick after this one.
    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }

    /// Ticks elapsed since `earlier`, 0 if `earlier` is not earlier.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tick counter plus accumulated simulated time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimClock {
    /// The tick about to be processed.
    pub current_tick: Tick,
    /// Simulated seconds elapsed over all completed ticks.
    pub elapsed_secs: f64,
}

/// Relative slack when comparing summed deltas against a horizon, so that
/// ten steps of 0.1 s reach a 1 s horizon.
pub const HORIZON_TOLERANCE: f64 = 1e-9;

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the current tick, which lasted `delta` simulated seconds.
    #[inline]
    pub fn advance(&mut self, delta: f64) {
        self.current_tick = self.current_tick.next();
        self.elapsed_secs += delta;
    }

    /// `true` once `elapsed_secs` has reached `horizon_secs`, within a
    /// relative [`HORIZON_TOLERANCE`] of summation error.
    #[inline]
    pub fn reached(&self, horizon_secs: f64) -> bool {
        self.elapsed_secs >= horizon_secs - horizon_secs.abs() * HORIZON_TOLERANCE
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} s)", self.current_tick, self.elapsed_secs)
    }
}

// ── TimeStep ──────────────────────────────────────────────────────────────────

/// Where each tick's `delta` comes from when the engine picks it itself.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
pub enum TimeStep {
    /// Every tick lasts exactly `secs` simulated seconds.  Deterministic.
    Fixed { secs: f64 },

    /// `delta` is the wall-clock time the previous tick took.  With
    /// `max_tps` set the loop sleeps so it never exceeds that many ticks per
    /// second, and `delta` is at least `1 / max_tps`.
    RealTime { max_tps: Option<f64> },
}

impl Default for TimeStep {
    fn default() -> Self {
        TimeStep::Fixed { secs: 1.0 }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically embedded in a scenario file and passed to the simulation
/// builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// How `Sim::step` obtains each tick's delta.
    pub time_step: TimeStep,

    /// Total simulated seconds after which the run stops.  `None` = no
    /// horizon.
    pub horizon_secs: Option<f64>,

    /// Stop as soon as no vehicle remains on the road.
    pub stop_when_idle: bool,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Call `SimObserver::on_snapshot` every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time_step:             TimeStep::default(),
            horizon_secs:          None,
            stop_when_idle:        false,
            seed:                  0,
            output_interval_ticks: 1,
        }
    }
}

impl SimConfig {
    /// Reject steps, rates and horizons that would stall or corrupt the loop.
    pub fn validate(&self) -> CoreResult<()> {
        match self.time_step {
            TimeStep::Fixed { secs } if !(secs.is_finite() && secs > 0.0) => {
                return Err(CoreError::Config(format!(
                    "fixed time step must be finite and positive, got {secs}"
                )));
            }
            TimeStep::RealTime { max_tps: Some(tps) } if !(tps.is_finite() && tps > 0.0) => {
                return Err(CoreError::Config(format!(
                    "max_tps must be finite and positive, got {tps}"
                )));
            }
            _ => {}
        }
        if let Some(h) = self.horizon_secs {
            if h.is_nan() || h < 0.0 {
                return Err(CoreError::Config(format!(
                    "horizon must be non-negative, got {h}"
                )));
            }
        }
        Ok(())
    }

    /// `true` if the run has a built-in end (horizon or idle stop).
    #[inline]
    pub fn is_bounded(&self) -> bool {
        self.horizon_secs.is_some() || self.stop_when_idle
    }
}

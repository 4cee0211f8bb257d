//! Periodic two-state signal controller.
//!
//! # Cycle
//!
//! `phase` runs from 0 up to `period` and wraps.  The controller is `Open`
//! while `phase < duty_cycle × period` and `Closed` for the rest of the
//! period, so it is open for exactly `duty_cycle` of every period when
//! advanced in small steps.  State is re-derived from `phase` after every
//! advance; there are no partial states.
//!
//! # Auto-adjust
//!
//! An auto-adjusting controller runs two phases: its controlled edges are
//! open for the duty portion and every other edge at the intersection for
//! the remainder.  Waits are booked per side.  Once at least
//! [`ADJUST_AFTER_SECS`] have been booked and the sides differ by more than
//! [`ADJUST_IMBALANCE`] of the total, the duty cycle becomes
//!
//! ```text
//!        c / (1 - d)
//! d' = ---------------------
//!      c / (1 - d) + u / d
//! ```
//!
//! where `c` and `u` are the controlled and uncontrolled waits, and both
//! counters restart from zero.  A controller at `d = 1` uses `c / (c + u)`.
//! The result is clamped to `[MIN_ADJUSTED_DUTY, 1]`.

use std::collections::BTreeSet;
use std::fmt;

use tsim_core::{EdgeId, SparseIndex, VertexId};

use crate::{SignalError, SignalResult};

/// Whether a controller currently lets traffic onto its controlled edges.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GateState {
    Open,
    Closed,
}

impl GateState {
    #[inline]
    pub fn is_open(self) -> bool {
        self == GateState::Open
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            GateState::Open => "ON",
            GateState::Closed => "OFF",
        })
    }
}

/// Booked waiting time needed before an auto-adjusting controller rebalances.
pub const ADJUST_AFTER_SECS: f64 = 300.0;

/// Relative difference between the two wait counters that triggers a
/// rebalance.
pub const ADJUST_IMBALANCE: f64 = 0.1;

/// Floor for a rebalanced duty cycle.
pub const MIN_ADJUSTED_DUTY: f64 = 0.01;

/// A traffic light standing at one intersection.
#[derive(Clone, Debug, PartialEq)]
pub struct SignalController {
    duty_cycle:        f64,
    period:            f64,
    controlled:        BTreeSet<EdgeId>,
    state:             GateState,
    phase:             f64,
    waited_secs:       f64,
    auto_adjust:       bool,
    controlled_wait:   f64,
    uncontrolled_wait: f64,
}

impl SignalController {
    /// A controller at phase 0 (and therefore `Open`).
    ///
    /// # Errors
    ///
    /// `InvalidDutyCycle` unless `0 < duty_cycle <= 1`; `InvalidPeriod`
    /// unless `period` is finite and positive.
    pub fn new(
        duty_cycle: f64,
        period: f64,
        controlled: impl IntoIterator<Item = EdgeId>,
    ) -> SignalResult<Self> {
        if !(duty_cycle > 0.0 && duty_cycle <= 1.0) {
            return Err(SignalError::InvalidDutyCycle(duty_cycle));
        }
        if !(period.is_finite() && period > 0.0) {
            return Err(SignalError::InvalidPeriod(period));
        }
        let mut ctl = Self {
            duty_cycle,
            period,
            controlled: controlled.into_iter().collect(),
            state: GateState::Open,
            phase: 0.0,
            waited_secs: 0.0,
            auto_adjust: false,
            controlled_wait: 0.0,
            uncontrolled_wait: 0.0,
        };
        ctl.refresh();
        Ok(ctl)
    }

    /// Start the cycle at `phase` instead of 0, e.g. to stagger neighbouring
    /// lights.  Wrapped into `[0, period)`.
    pub fn with_phase(mut self, phase: f64) -> Self {
        if phase.is_finite() {
            self.phase = phase.rem_euclid(self.period);
            self.refresh();
        }
        self
    }

    /// Switch to two-phase operation with a self-tuning duty cycle.
    pub fn with_auto_adjust(mut self, on: bool) -> Self {
        self.auto_adjust = on;
        self
    }

    /// Move the cycle forward by `delta` seconds, rebalance if due, and
    /// recompute the state.
    pub fn advance(&mut self, delta: f64) {
        self.phase = (self.phase + delta).rem_euclid(self.period);
        if self.auto_adjust {
            self.rebalance();
        }
        self.refresh();
    }

    fn rebalance(&mut self) {
        let (c, u) = (self.controlled_wait, self.uncontrolled_wait);
        let total = c + u;
        if total < ADJUST_AFTER_SECS || ((c - u) / total).abs() <= ADJUST_IMBALANCE {
            return;
        }
        let d = self.duty_cycle;
        let next = if d >= 1.0 {
            c / total
        } else {
            let c_rate = c / (1.0 - d);
            c_rate / (c_rate + u / d)
        };
        self.duty_cycle = next.clamp(MIN_ADJUSTED_DUTY, 1.0);
        self.controlled_wait = 0.0;
        self.uncontrolled_wait = 0.0;
        log::debug!("duty cycle {d:.3} -> {:.3} (waits {c:.1}/{u:.1})", self.duty_cycle);
    }

    fn refresh(&mut self) {
        self.state = if self.phase < self.duty_cycle * self.period {
            GateState::Open
        } else {
            GateState::Closed
        };
    }

    /// `true` if a vehicle may enter `edge` right now.  Edges this
    /// controller does not gate are always open, or open while it is
    /// `Closed` when it auto-adjusts.
    #[inline]
    pub fn is_open(&self, edge: EdgeId) -> bool {
        if self.controlled.contains(&edge) {
            self.state.is_open()
        } else {
            !(self.auto_adjust && self.state.is_open())
        }
    }

    /// Book `secs` of vehicle waiting time in front of `edge`.
    pub fn record_wait(&mut self, edge: EdgeId, secs: f64) {
        self.waited_secs += secs;
        if self.controlled.contains(&edge) {
            self.controlled_wait += secs;
        } else {
            self.uncontrolled_wait += secs;
        }
    }

    pub fn duty_cycle(&self) -> f64 {
        self.duty_cycle
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    /// Gated edges, ascending.
    pub fn controlled(&self) -> &BTreeSet<EdgeId> {
        &self.controlled
    }

    pub fn controls(&self, edge: EdgeId) -> bool {
        self.controlled.contains(&edge)
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Position in the cycle, in `[0, period)`.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// `phase / period`, in `[0, 1)`.
    pub fn phase_fraction(&self) -> f64 {
        self.phase / self.period
    }

    /// Total vehicle-seconds spent halted at this light's closed edges.
    pub fn waited_secs(&self) -> f64 {
        self.waited_secs
    }

    pub fn auto_adjust(&self) -> bool {
        self.auto_adjust
    }

    /// Waits booked on controlled edges since the last rebalance.
    pub fn controlled_wait_secs(&self) -> f64 {
        self.controlled_wait
    }

    /// Waits booked on other edges since the last rebalance.
    pub fn uncontrolled_wait_secs(&self) -> f64 {
        self.uncontrolled_wait
    }
}

// ── Lookup ────────────────────────────────────────────────────────────────────

/// Gate query used by vehicles.
pub trait SignalLookup {
    /// May a vehicle at intersection `at` enter `edge`?
    fn is_open(&self, at: VertexId, edge: EdgeId) -> bool;
}

impl SignalLookup for SparseIndex<SignalController> {
    #[inline]
    fn is_open(&self, at: VertexId, edge: EdgeId) -> bool {
        self.get(at.index()).is_none_or(|ctl| ctl.is_open(edge))
    }
}

/// No lights anywhere.
impl SignalLookup for () {
    #[inline]
    fn is_open(&self, _at: VertexId, _edge: EdgeId) -> bool {
        true
    }
}

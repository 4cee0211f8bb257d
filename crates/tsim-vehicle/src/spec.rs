//! Vehicle parameters and the shared motion model.

use tsim_core::VertexId;

use crate::{VehicleError, VehicleResult};

/// Everything needed to put one vehicle on the road.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleSpec {
    /// Top speed in graph-weight units per second.  Must be finite and > 0.
    pub max_speed: f64,

    /// Per-tick probability of braking, in `[0, 1]`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub misbehavior: f64,

    /// Vertices to visit in order.  Revisits are allowed; the vehicle
    /// finishes when it reaches the last entry.
    pub route: Vec<VertexId>,

    /// Display name.  Empty means unlabelled.
    #[cfg_attr(feature = "serde", serde(default))]
    pub label: String,
}

impl VehicleSpec {
    pub fn new(max_speed: f64, misbehavior: f64, route: impl IntoIterator<Item = VertexId>) -> Self {
        Self {
            max_speed,
            misbehavior,
            route: route.into_iter().collect(),
            label: String::new(),
        }
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Check the scalar parameters and route length.  Hop existence needs the
    /// graph and is checked by [`Vehicle::new`](crate::Vehicle::new).
    pub fn validate(&self) -> VehicleResult<()> {
        if !(self.max_speed.is_finite() && self.max_speed > 0.0) {
            return Err(VehicleError::InvalidParameter(format!(
                "max_speed must be finite and > 0, got {}",
                self.max_speed
            )));
        }
        if !(0.0..=1.0).contains(&self.misbehavior) {
            return Err(VehicleError::InvalidParameter(format!(
                "misbehavior must be in [0, 1], got {}",
                self.misbehavior
            )));
        }
        if self.route.len() < 2 {
            return Err(VehicleError::InvalidRoute(self.route.len()));
        }
        Ok(())
    }
}

/// Acceleration and braking behaviour shared by every vehicle in a run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionModel {
    /// Speed gained per second while not braking.  `f64::INFINITY` means
    /// vehicles jump straight to their cap.
    pub acceleration: f64,

    /// Multiplier applied to speed on a braking tick, in `[0, 1)`.
    pub brake_factor: f64,
}

impl Default for MotionModel {
    fn default() -> Self {
        Self { acceleration: f64::INFINITY, brake_factor: 0.5 }
    }
}

impl MotionModel {
    pub fn validate(&self) -> VehicleResult<()> {
        if !(self.acceleration > 0.0) {
            return Err(VehicleError::InvalidParameter(format!(
                "acceleration must be > 0, got {}",
                self.acceleration
            )));
        }
        if !(0.0..1.0).contains(&self.brake_factor) {
            return Err(VehicleError::InvalidParameter(format!(
                "brake_factor must be in [0, 1), got {}",
                self.brake_factor
            )));
        }
        Ok(())
    }
}

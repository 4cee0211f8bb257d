//! Seeded random streams.
//!
//! Every vehicle owns a [`VehicleRng`] derived from the run's seed and its
//! own id:
//!
//!   stream seed = run seed XOR (vehicle id × φ₆₄)
//!
//! where φ₆₄ is the 64-bit fractional part of the golden ratio.  Streams are
//! therefore independent of each other and of the order in which vehicles
//! are processed, and a car added mid-run leaves the earlier cars' draws
//! untouched.
//!
//! [`SimRng`] is for setup-time randomness such as generating extra cars.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::VehicleId;

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-vehicle deterministic RNG.
#[derive(Debug, Clone)]
pub struct VehicleRng(SmallRng);

impl VehicleRng {
    pub fn new(run_seed: u64, vehicle: VehicleId) -> Self {
        let seed = run_seed ^ u64::from(vehicle.0).wrapping_mul(GOLDEN_GAMMA);
        Self(SmallRng::seed_from_u64(seed))
    }

    /// `true` with probability `p`, clamped to `[0, 1]`.
    ///
    /// Exactly one draw per call whatever `p` is, so two runs stay in step
    /// even if one of them uses probability 0.
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.unit() < p.clamp(0.0, 1.0)
    }

    /// Uniform in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.0.r#gen()
    }
}

/// Run-level RNG for scenario generation.  Never consulted by the tick loop.
#[derive(Debug, Clone)]
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    /// An independent stream labelled `stream`, split off this one.
    pub fn child(&mut self, stream: u64) -> SimRng {
        let seed = self.0.r#gen::<u64>() ^ stream.wrapping_mul(GOLDEN_GAMMA);
        SimRng(SmallRng::seed_from_u64(seed))
    }

    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// A uniformly chosen element, `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.0)
    }
}

//! SEA Concepts Stream
//!
//! Three features drawn uniformly from [0, 10). Only the first two are
//! relevant: the label is 1 when x₀ + x₁ ≤ θ. Each drift point moves to
//! the next threshold θ in the cycle, and labels may be flipped with a
//! fixed noise probability.
//!
//! Street & Kim, "A Streaming Ensemble Algorithm (SEA) for Large-Scale
//! Classification", KDD (2001).

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::InstanceStream;
use crate::learners::Instance;

/// Thresholds of the four classic SEA concepts
pub const SEA_THRESHOLDS: [f64; 4] = [8.0, 9.0, 7.0, 9.5];

/// SEA stream with abrupt threshold changes
pub struct SeaStream {
    thresholds: Vec<f64>,
    drift_points: Vec<u64>,
    /// Probability of flipping a label
    noise: f64,
    position: u64,
    rng: StdRng,
}

impl SeaStream {
    /// SEA stream cycling through [`SEA_THRESHOLDS`]
    pub fn new(drift_points: Vec<u64>, noise: f64, seed: u64) -> Self {
        Self::with_thresholds(SEA_THRESHOLDS.to_vec(), drift_points, noise, seed)
    }

    /// SEA stream with custom thresholds (at least one)
    pub fn with_thresholds(
        thresholds: Vec<f64>,
        drift_points: Vec<u64>,
        noise: f64,
        seed: u64,
    ) -> Self {
        let thresholds = if thresholds.is_empty() {
            vec![SEA_THRESHOLDS[0]]
        } else {
            thresholds
        };
        let mut drift_points = drift_points;
        drift_points.sort_unstable();
        Self {
            thresholds,
            drift_points,
            noise: noise.clamp(0.0, 1.0),
            position: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Threshold θ in effect at the current position
    pub fn threshold(&self) -> f64 {
        let passed = self
            .drift_points
            .iter()
            .filter(|&&p| p <= self.position)
            .count();
        self.thresholds[passed % self.thresholds.len()]
    }
}

impl InstanceStream for SeaStream {
    fn next_instance(&mut self) -> Instance {
        self.position += 1;

        let rng = &mut self.rng;
        let features = Array1::from_iter((0..3).map(|_| rng.random_range(0.0..10.0)));

        let clean = features[0] + features[1] <= self.threshold();
        let flip = self.noise > 0.0 && self.rng.random_bool(self.noise);
        let label = usize::from(clean != flip);

        Instance::new(features, label)
    }

    fn n_features(&self) -> usize {
        3
    }

    fn n_classes(&self) -> usize {
        2
    }

    fn drift_points(&self) -> &[u64] {
        &self.drift_points
    }
}

//! Gaussian Blob Stream with Label Reversal
//!
//! Class 0 is centered at -s/2 and class 1 at +s/2 on every axis, with
//! unit variance. After each drift point the mapping from blob to label
//! flips, so a model trained on the old concept becomes almost always
//! wrong.

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

use super::InstanceStream;
use crate::learners::Instance;

/// Two-class Gaussian stream with abrupt label reversals
pub struct GaussianDriftStream {
    n_features: usize,
    /// Distance between blob centers along each axis
    separation: f64,
    drift_points: Vec<u64>,
    /// Instances emitted so far
    position: u64,
    rng: StdRng,
}

impl GaussianDriftStream {
    /// Create a stream of `n_features`-dimensional blobs
    ///
    /// # Arguments
    /// * `n_features` - Feature dimension
    /// * `separation` - Distance between class centers per axis
    /// * `drift_points` - Positions where labels flip
    /// * `seed` - RNG seed
    pub fn new(n_features: usize, separation: f64, drift_points: Vec<u64>, seed: u64) -> Self {
        let mut drift_points = drift_points;
        drift_points.sort_unstable();
        Self {
            n_features,
            separation,
            drift_points,
            position: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Number of reversals applied at the current position
    pub fn concept(&self) -> usize {
        self.drift_points
            .iter()
            .filter(|&&p| p <= self.position)
            .count()
    }
}

impl InstanceStream for GaussianDriftStream {
    fn next_instance(&mut self) -> Instance {
        self.position += 1;

        let blob = usize::from(self.rng.random_bool(0.5));
        let center = if blob == 1 {
            self.separation / 2.0
        } else {
            -self.separation / 2.0
        };
        let rng = &mut self.rng;
        let features = Array1::from_iter((0..self.n_features).map(|_| {
            let z: f64 = StandardNormal.sample(&mut *rng);
            center + z
        }));

        let label = if self.concept() % 2 == 0 { blob } else { 1 - blob };
        Instance::new(features, label)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        2
    }

    fn drift_points(&self) -> &[u64] {
        &self.drift_points
    }
}

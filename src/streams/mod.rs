//! Synthetic Streams: Labeled Instance Sources with Known Drift
//!
//! Test beds for the detector. Each stream knows where its concept
//! changes, so detections can be compared against ground truth:
//!
//! - **Gaussian drift**: two Gaussian class blobs whose labels swap
//! - **SEA concepts**: threshold on x₀ + x₁ that jumps between concepts
//!
//! Streams are seeded, so a given seed always replays the same sequence.

mod gaussian;
mod sea;

pub use gaussian::GaussianDriftStream;
pub use sea::SeaStream;

use crate::learners::Instance;

/// Ordered, unbounded source of labeled instances
pub trait InstanceStream {
    /// Produce the next instance
    fn next_instance(&mut self) -> Instance;

    /// Number of features per instance
    fn n_features(&self) -> usize;

    /// Number of class labels
    fn n_classes(&self) -> usize;

    /// 1-based stream positions at which a new concept starts
    fn drift_points(&self) -> &[u64];

    /// Draw `n` instances
    fn take_instances(&mut self, n: usize) -> Vec<Instance> {
        (0..n).map(|_| self.next_instance()).collect()
    }
}

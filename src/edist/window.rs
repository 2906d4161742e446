//! Error-Distance Window: Incremental Gap Statistics
//!
//! A window tracks the distances between consecutive misclassifications
//! and keeps every instance observed while it was filling.

use tracing::trace;

use super::config::PoolingFormula;

/// Keeps the variance recurrence finite when the window is still empty.
const VARIANCE_GUARD: f64 = f64::MIN_POSITIVE;

/// Fixed-capacity accumulator of error-distance statistics
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorWindow<I> {
    /// Mean distance between errors μ
    mu: f64,
    /// Standard deviation of the distances δ
    delta: f64,
    /// Number of distances absorbed
    n: usize,
    /// Capacity (maxN)
    max_n: usize,
    /// Set once `n` reaches `max_n`, kept after pooling grows `n` further
    completed: bool,
    /// Stream index of the most recent error
    last_error_index: u64,
    /// Instances observed while filling
    buffer: Vec<I>,
}

impl<I> ErrorWindow<I> {
    /// Create an empty window whose first gap is measured from `last_error_index`.
    pub fn new(max_n: usize, last_error_index: u64) -> Self {
        Self {
            mu: 0.0,
            delta: 0.0,
            n: 0,
            max_n,
            completed: false,
            last_error_index,
            buffer: Vec::new(),
        }
    }

    /// Create a window directly from summary statistics, with an empty buffer.
    ///
    /// The window is completed when `n >= max_n`.
    pub fn with_statistics(mu: f64, delta: f64, n: usize, max_n: usize) -> Self {
        Self {
            mu,
            delta,
            n,
            max_n,
            completed: n >= max_n,
            last_error_index: 0,
            buffer: Vec::new(),
        }
    }

    /// Absorb a misclassification at absolute stream index `error_index`.
    ///
    /// Updates the running mean and deviation of the gap
    /// `d = error_index - last_error_index`:
    ///
    ///   μ' = n/(n+1)·μ + d/(n+1)
    ///   δ' = sqrt((n-1)·δ²/n + (d - μ')²/(n+1))
    pub fn update(&mut self, error_index: u64) {
        let d = error_index as f64 - self.last_error_index as f64;
        let n = self.n as f64;

        self.mu = (n / (n + 1.0)) * self.mu + d / (n + 1.0);

        // (n - 1) is negative for the first error; δ is still zero there.
        let spread = (n - 1.0) * self.delta.powi(2) / (n + VARIANCE_GUARD);
        let innovation = (d - self.mu).powi(2) / (n + 1.0);
        self.delta = (spread + innovation).max(0.0).sqrt();

        self.n += 1;
        self.last_error_index = error_index;

        if self.n == self.max_n {
            self.completed = true;
        }
    }

    /// Record an instance observed while filling.
    pub fn append(&mut self, instance: I) {
        self.buffer.push(instance);
    }

    /// Move `other`'s buffered instances after this window's own.
    pub fn merge(&mut self, other: ErrorWindow<I>) {
        self.buffer.extend(other.buffer);
    }

    /// Fold a completed window into this one: pooled statistics, the
    /// source's error recency, and the concatenated buffers.
    pub fn absorb(&mut self, source: ErrorWindow<I>, formula: PoolingFormula) {
        let total = self.n + source.n;
        if total > 0 {
            let (mu, delta) = match formula {
                PoolingFormula::Standard => self.pooled_standard(&source),
                PoolingFormula::Literal => self.pooled_literal(&source),
            };
            trace!(
                from_mu = self.mu,
                to_mu = mu,
                from_n = self.n,
                to_n = total,
                "pooled window statistics"
            );
            self.mu = mu;
            self.delta = delta;
        }
        self.n = total;
        self.last_error_index = source.last_error_index;
        self.merge(source);
    }

    fn pooled_standard(&self, source: &ErrorWindow<I>) -> (f64, f64) {
        let (tn, sn) = (self.n as f64, source.n as f64);
        let total = tn + sn;

        let mu = (tn * self.mu + sn * source.mu) / total;
        let within = (tn * self.delta.powi(2) + sn * source.delta.powi(2)) / total;
        let between = (tn * sn / total.powi(2)) * (self.mu - source.mu).powi(2);

        (mu, (within + between).sqrt())
    }

    fn pooled_literal(&self, source: &ErrorWindow<I>) -> (f64, f64) {
        let (tn, sn) = (self.n as f64, source.n as f64);
        let total = tn + sn;

        // Integer division, as in the reference.
        let prefactor = (1 / (self.n + source.n)) as f64;
        let mu = prefactor * (tn * self.mu + sn + source.mu);

        let within = (tn * self.delta.powi(2) + sn * source.delta.powi(2)) / total;
        let between = (tn * sn / total.powi(2)) * (mu - source.mu).powi(2);

        (mu, (within + between).sqrt())
    }

    /// Has the window absorbed its quota of errors?
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Mean error distance μ
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Error distance standard deviation δ
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Number of distances absorbed
    pub fn n(&self) -> usize {
        self.n
    }

    /// Error quota
    pub fn max_n(&self) -> usize {
        self.max_n
    }

    /// Stream index of the latest error seen by this window
    pub fn last_error_index(&self) -> u64 {
        self.last_error_index
    }

    /// Buffered instances, oldest first
    pub fn buffer(&self) -> &[I] {
        &self.buffer
    }
}

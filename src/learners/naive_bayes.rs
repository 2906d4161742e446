//! Incremental Gaussian Naive Bayes
//!
//! Per-class feature means and variances are maintained with Welford's
//! recurrence, so a single pass over the stream is enough:
//!
//!   δ = x - μ;  μ += δ/n;  M₂ += δ·(x - μ)
//!
//! Scores are posterior class probabilities computed in log space.

use ndarray::Array1;
use std::f64::consts::PI;

use crate::error::LearnerError;

use super::{argmax, Classifier, Instance};

/// Lower bound on per-feature variance
const MIN_VARIANCE: f64 = 1e-3;

/// Running sufficient statistics of one class
#[derive(Debug, Clone)]
struct ClassStats {
    count: f64,
    mean: Array1<f64>,
    m2: Array1<f64>,
}

impl ClassStats {
    fn new(n_features: usize) -> Self {
        Self {
            count: 0.0,
            mean: Array1::zeros(n_features),
            m2: Array1::zeros(n_features),
        }
    }

    fn observe(&mut self, x: &Array1<f64>) {
        self.count += 1.0;
        let delta = x - &self.mean;
        self.mean = &self.mean + &(&delta / self.count);
        let after = x - &self.mean;
        self.m2 = &self.m2 + &(&delta * &after);
    }

    fn variance(&self) -> Array1<f64> {
        (&self.m2 / self.count).mapv(|v| v.max(MIN_VARIANCE))
    }

    fn log_likelihood(&self, x: &Array1<f64>) -> f64 {
        let var = self.variance();
        let sq = (x - &self.mean).mapv(|d| d * d);
        let norm = var.mapv(|v| (2.0 * PI * v).ln()).sum();
        -0.5 * (norm + (&sq / &var).sum())
    }
}

/// Gaussian naive Bayes over dense features
#[derive(Debug, Clone)]
pub struct GaussianNaiveBayes {
    n_features: usize,
    classes: Vec<ClassStats>,
}

impl GaussianNaiveBayes {
    pub fn new(n_features: usize, n_classes: usize) -> Self {
        Self {
            n_features,
            classes: (0..n_classes).map(|_| ClassStats::new(n_features)).collect(),
        }
    }

    /// Total number of training instances absorbed
    pub fn n_trained(&self) -> usize {
        self.classes.iter().map(|c| c.count as usize).sum()
    }

    fn check(&self, instance: &Instance) -> Result<(), LearnerError> {
        if instance.dimension() != self.n_features {
            return Err(LearnerError::DimensionMismatch {
                expected: self.n_features,
                found: instance.dimension(),
            });
        }
        if instance.label >= self.classes.len() {
            return Err(LearnerError::LabelOutOfRange {
                label: instance.label,
                n_classes: self.classes.len(),
            });
        }
        Ok(())
    }
}

impl Classifier for GaussianNaiveBayes {
    type Instance = Instance;
    type Error = LearnerError;

    fn train(&mut self, instance: &Instance) -> Result<(), LearnerError> {
        self.check(instance)?;
        self.classes[instance.label].observe(&instance.features);
        Ok(())
    }

    fn predict(&self, instance: &Instance) -> Result<Vec<f64>, LearnerError> {
        if instance.dimension() != self.n_features {
            return Err(LearnerError::DimensionMismatch {
                expected: self.n_features,
                found: instance.dimension(),
            });
        }

        let total: f64 = self.classes.iter().map(|c| c.count).sum();
        if total == 0.0 {
            return Ok(vec![0.0; self.classes.len()]);
        }

        let log_post: Vec<Option<f64>> = self
            .classes
            .iter()
            .map(|c| {
                (c.count > 0.0)
                    .then(|| (c.count / total).ln() + c.log_likelihood(&instance.features))
            })
            .collect();

        let max = log_post
            .iter()
            .flatten()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        let unnorm: Vec<f64> = log_post
            .iter()
            .map(|lp| lp.map_or(0.0, |v| (v - max).exp()))
            .collect();
        let z: f64 = unnorm.iter().sum();

        Ok(unnorm.into_iter().map(|p| p / z).collect())
    }

    fn correctly_classifies(&self, instance: &Instance) -> Result<bool, LearnerError> {
        self.check(instance)?;
        let scores = self.predict(instance)?;
        Ok(argmax(&scores) == Some(instance.label))
    }

    fn reset_learning(&mut self) {
        let n_features = self.n_features;
        self.classes
            .iter_mut()
            .for_each(|c| *c = ClassStats::new(n_features));
    }
}

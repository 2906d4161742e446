//! Learners Module: The Classifier Collaborator
//!
//! The detector never looks inside a model. It only needs the capability
//! set below, so any incremental learner can be monitored:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Classifier Trait                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  + train(x)                - Learn from one labeled instance │
//! │  + predict(x)              - Per-class score vector          │
//! │  + correctly_classifies(x) - Does the argmax hit the label?  │
//! │  + reset_learning()        - Forget everything learned       │
//! │  + clone()                 - Independent copy                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two reference learners are bundled: a majority-class baseline and an
//! incremental Gaussian naive Bayes.

mod majority;
mod naive_bayes;

pub use majority::MajorityClass;
pub use naive_bayes::GaussianNaiveBayes;

use ndarray::Array1;

/// Incremental classifier monitored by the detector
pub trait Classifier: Clone {
    /// Labeled instance type
    type Instance: Clone + std::fmt::Debug;
    /// Failure raised while training or predicting
    type Error: std::error::Error;

    /// Learn from a single labeled instance
    fn train(&mut self, instance: &Self::Instance) -> Result<(), Self::Error>;

    /// Per-class scores, higher is more likely
    fn predict(&self, instance: &Self::Instance) -> Result<Vec<f64>, Self::Error>;

    /// Whether the current model predicts the instance's true label
    fn correctly_classifies(&self, instance: &Self::Instance) -> Result<bool, Self::Error>;

    /// Return to the untrained state, keeping the configuration
    fn reset_learning(&mut self);
}

/// Labeled instance with dense numeric features
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    /// Feature vector
    pub features: Array1<f64>,
    /// True class index
    pub label: usize,
}

impl Instance {
    pub fn new(features: Array1<f64>, label: usize) -> Self {
        Self { features, label }
    }

    /// Number of features
    pub fn dimension(&self) -> usize {
        self.features.len()
    }
}

/// Index of the highest score, first one on ties
pub fn argmax(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &s) in scores.iter().enumerate() {
        match best {
            Some((_, b)) if s <= b => {}
            _ => best = Some((i, s)),
        }
    }
    best.map(|(i, _)| i)
}

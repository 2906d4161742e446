//! Majority-class baseline

use crate::error::LearnerError;

use super::{argmax, Classifier, Instance};

/// Predicts the most frequent label seen so far
#[derive(Debug, Clone)]
pub struct MajorityClass {
    /// Observed count per class
    counts: Vec<f64>,
}

impl MajorityClass {
    pub fn new(n_classes: usize) -> Self {
        Self {
            counts: vec![0.0; n_classes],
        }
    }

    /// Number of classes
    pub fn n_classes(&self) -> usize {
        self.counts.len()
    }

    fn check_label(&self, instance: &Instance) -> Result<(), LearnerError> {
        if instance.label >= self.counts.len() {
            return Err(LearnerError::LabelOutOfRange {
                label: instance.label,
                n_classes: self.counts.len(),
            });
        }
        Ok(())
    }
}

impl Classifier for MajorityClass {
    type Instance = Instance;
    type Error = LearnerError;

    fn train(&mut self, instance: &Instance) -> Result<(), LearnerError> {
        self.check_label(instance)?;
        self.counts[instance.label] += 1.0;
        Ok(())
    }

    fn predict(&self, _instance: &Instance) -> Result<Vec<f64>, LearnerError> {
        Ok(self.counts.clone())
    }

    fn correctly_classifies(&self, instance: &Instance) -> Result<bool, LearnerError> {
        self.check_label(instance)?;
        Ok(argmax(&self.counts) == Some(instance.label))
    }

    fn reset_learning(&mut self) {
        self.counts.iter_mut().for_each(|c| *c = 0.0);
    }
}

//! Error types for the EDIST2 detector.
//!
//! Only configuration problems are reported through [`EdistError`].
//! Failures raised by a classifier collaborator are surfaced with the
//! collaborator's own error type (see [`crate::Classifier::Error`]).

use thiserror::Error;

/// Errors raised while setting up a detector.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EdistError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias for detector setup.
pub type Result<T> = std::result::Result<T, EdistError>;

/// Errors raised by the bundled reference learners.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LearnerError {
    #[error("instance has {found} features, learner expects {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("class label {label} out of range for {n_classes} classes")]
    LabelOutOfRange { label: usize, n_classes: usize },
}

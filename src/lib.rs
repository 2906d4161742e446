//! # EDIST2 Drift
//!
//! Error-distance concept drift detection for streaming classifiers,
//! with automatic model replacement.
//!
//! ## Approach
//!
//! A classifier learning from a data stream degrades when the concept
//! behind the stream changes. Instead of tracking the error *rate*, this
//! crate tracks the *distance* between consecutive errors:
//!
//! 1. **Error windows**: fixed-quota windows keep the running mean and
//!    deviation of error distances, plus the instances they covered
//!
//! 2. **Three-level test**: the latest window is compared against the
//!    reference with a one-sided normal bound and classified as Control,
//!    Warning or Drift
//!
//! 3. **Model replacement**: a background model trains while the detector
//!    is in Warning and replaces the active model on Drift
//!
//! The test is one-sided: errors becoming *rarer* never raise an alarm.
//!
//! ## Usage
//!
//! ```no_run
//! use edist_drift::{Edist2, EdistConfig, GaussianNaiveBayes, GaussianDriftStream, InstanceStream};
//!
//! let mut stream = GaussianDriftStream::new(2, 3.0, vec![5_000], 42);
//! let learner = GaussianNaiveBayes::new(stream.n_features(), stream.n_classes());
//! let mut detector = Edist2::new(EdistConfig::with_max_errors(30), learner).unwrap();
//!
//! for _ in 0..10_000 {
//!     let x = stream.next_instance();
//!     detector.train_on_instance(&x).unwrap();
//! }
//! println!("drifts: {}", detector.summary().drifts);
//! ```
//!
//! ## References
//!
//! - Khamassi, Sayed-Mouchaweh, Hammami, "Self-Adaptive Windowing Approach
//!   for Handling Complex Concept Drift", Cognitive Computation (2015)
//! - Street & Kim, "A Streaming Ensemble Algorithm (SEA) for Large-Scale
//!   Classification", KDD (2001)

pub mod edist;
pub mod error;
pub mod learners;
pub mod streams;

// Re-exports from edist
pub use edist::{
    detect_level,
    level_test,
    DetectorSummary,
    DriftEvent,
    DriftLevel,
    Edist2,
    EdistConfig,
    ErrorWindow,
    LevelTest,
    PoolingFormula,
    StepOutcome,
};

// Re-exports from error
pub use error::{EdistError, LearnerError, Result};

// Re-exports from learners
pub use learners::{
    argmax,
    Classifier,
    GaussianNaiveBayes,
    Instance,
    MajorityClass,
};

// Re-exports from streams
pub use streams::{
    GaussianDriftStream,
    InstanceStream,
    SeaStream,
};

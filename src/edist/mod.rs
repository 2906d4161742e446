//! EDIST2 Module: Error-Distance Concept Drift Detection
//!
//! Monitors a streaming classifier through the distances between its
//! consecutive errors. A well-performing model makes errors far apart; a
//! model overtaken by a new concept makes them close together.
//!
//! ## Windows
//!
//! A window absorbs a fixed number of errors N and keeps the running
//! mean μ and standard deviation δ of their distances. The *global*
//! window describes normal behavior, the *current* window the latest
//! batch, and the *shadow* window collects batches flagged as Warning.
//!
//! ## Hypothesis Test
//!
//!   μ_d = μ_global - μ_current
//!   δ_d = sqrt(δ²_global/N_global + δ²_current/N_current)
//!   ε   = 1.65·δ_d
//!
//! - μ_d > ε + δ_d: Drift, swap in the background model
//! - μ_d > ε: Warning, start training the background model
//! - otherwise: Control, pool current into global
//!
//! ## Reference
//!
//! Khamassi, Sayed-Mouchaweh, Hammami, "Self-Adaptive Windowing Approach
//! for Handling Complex Concept Drift", Cognitive Computation (2015).

mod config;
mod detector;
mod level;
mod window;

pub use config::{EdistConfig, PoolingFormula, DEFAULT_MAX_ERRORS};
pub use detector::{DetectorSummary, DriftEvent, Edist2, StepOutcome};
pub use level::{detect_level, level_test, DriftLevel, LevelTest, CONFIDENCE_Z};
pub use window::ErrorWindow;

//! Drift-Level Hypothesis Test
//!
//! Compares the current window against the global reference:
//!
//!   μ_d = μ_global - μ_current
//!   δ_d = sqrt(δ_global²/N_global + δ_current²/N_current)
//!   ε   = 1.65·δ_d
//!
//! The test is one-sided. Only shrinking error distances (errors arriving
//! more often) can raise Warning or Drift.

use serde::{Deserialize, Serialize};

use super::window::ErrorWindow;

/// One-sided 95% quantile of the standard normal
pub const CONFIDENCE_Z: f64 = 1.65;

/// Three-way verdict of the hypothesis test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftLevel {
    /// Current behavior is consistent with the reference
    Control,
    /// Degradation above ε, not yet above ε + δ_d
    Warning,
    /// Degradation above ε + δ_d
    Drift,
}

impl DriftLevel {
    /// Numeric code: 0 = control, 1 = warning, 2 = drift
    pub fn code(self) -> u8 {
        match self {
            DriftLevel::Control => 0,
            DriftLevel::Warning => 1,
            DriftLevel::Drift => 2,
        }
    }
}

/// Statistics behind a verdict
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelTest {
    /// Signed mean difference μ_d
    pub mu_d: f64,
    /// Pooled standard error δ_d
    pub delta_d: f64,
    /// Warning bound ε
    pub epsilon: f64,
    /// Resulting verdict
    pub level: DriftLevel,
}

/// Run the test and keep the intermediate statistics.
///
/// # Panics
/// If either window is empty. Windows are only compared once completed,
/// so an empty window here is a broken invariant.
pub fn level_test<I>(global: &ErrorWindow<I>, current: &ErrorWindow<I>) -> LevelTest {
    assert!(
        global.n() > 0 && current.n() > 0,
        "drift level requested on an empty window (global n = {}, current n = {})",
        global.n(),
        current.n()
    );

    let mu_d = global.mu() - current.mu();
    let delta_d = (global.delta().powi(2) / global.n() as f64
        + current.delta().powi(2) / current.n() as f64)
        .sqrt();
    let epsilon = CONFIDENCE_Z * delta_d;

    let level = if mu_d > epsilon + delta_d {
        DriftLevel::Drift
    } else if mu_d > epsilon {
        DriftLevel::Warning
    } else {
        DriftLevel::Control
    };

    LevelTest {
        mu_d,
        delta_d,
        epsilon,
        level,
    }
}

/// Verdict for `current` measured against `global`.
pub fn detect_level<I>(global: &ErrorWindow<I>, current: &ErrorWindow<I>) -> DriftLevel {
    level_test(global, current).level
}

//! Detector configuration.

use serde::{Deserialize, Serialize};

use crate::error::{EdistError, Result};

/// Default number of errors a window absorbs before it is evaluated.
pub const DEFAULT_MAX_ERRORS: usize = 30;

/// How two windows' gap statistics are pooled when one is folded into another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolingFormula {
    /// Count-weighted pooled mean and variance of two samples.
    #[default]
    Standard,
    /// Reproduces the published reference arithmetic bit for bit.
    ///
    /// The reference multiplies by an integer `1 / (N + M)` (zero for any
    /// two non-empty windows) and sums `N·mu + M + mu'` where `M·mu'` was
    /// meant, so the pooled mean collapses to `0.0`. The deviation is then
    /// computed against that collapsed mean. Only useful for parity runs.
    Literal,
}

/// Configuration for [`crate::Edist2`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdistConfig {
    /// Number of misclassifications per window (`maxN`).
    pub max_errors_per_window: usize,
    /// Formula used when merging a completed window into global or shadow.
    pub pooling: PoolingFormula,
}

impl Default for EdistConfig {
    fn default() -> Self {
        Self {
            max_errors_per_window: DEFAULT_MAX_ERRORS,
            pooling: PoolingFormula::Standard,
        }
    }
}

impl EdistConfig {
    /// Default configuration with a custom window capacity.
    pub fn with_max_errors(max_errors_per_window: usize) -> Self {
        Self {
            max_errors_per_window,
            ..Self::default()
        }
    }

    /// Switch the pooling formula.
    pub fn pooling(mut self, pooling: PoolingFormula) -> Self {
        self.pooling = pooling;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<()> {
        if self.max_errors_per_window < 1 {
            return Err(EdistError::InvalidConfig(format!(
                "max_errors_per_window must be at least 1, got {}",
                self.max_errors_per_window
            )));
        }
        Ok(())
    }
}

//! Solver configuration.

use serde::{Deserialize, Serialize};

/// Options shared by both echelon solves.
///
/// # Examples
///
/// ```
/// use u_echelon::SolverConfig;
///
/// let config = SolverConfig::default().with_allow_waiting_time(false);
/// assert!(!config.allow_waiting_time());
/// assert!(config.refill_on_classic_failure());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    allow_waiting_time: bool,
    refill_on_classic_failure: bool,
}

impl SolverConfig {
    /// Allows or forbids vehicles to wait for a time window to open.
    pub fn with_allow_waiting_time(mut self, allow: bool) -> Self {
        self.allow_waiting_time = allow;
        self
    }

    /// Enables or disables the refill merge fallback after a failed classic merge.
    pub fn with_refill_on_classic_failure(mut self, enabled: bool) -> Self {
        self.refill_on_classic_failure = enabled;
        self
    }

    /// Whether an early vehicle may wait for the time window to open.
    pub fn allow_waiting_time(&self) -> bool {
        self.allow_waiting_time
    }

    /// Whether a same-origin pair falls back to a refill merge when the
    /// classic merge is infeasible.
    pub fn refill_on_classic_failure(&self) -> bool {
        self.refill_on_classic_failure
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            allow_waiting_time: true,
            refill_on_classic_failure: true,
        }
    }
}

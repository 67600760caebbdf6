//! Tunables for settlement detection.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SettleConfig {
    /// Minimum wall-clock time since the loop started before
    /// settlement may be declared.
    pub min_elapsed_ms: u64,
    /// Required idle duration (no new resources) before settlement.
    pub idle_threshold_ms: u64,
    /// Minimum plausible resource count; guards against settling on
    /// pages that legitimately load few early resources before a
    /// late burst.
    pub min_resources: u64,
    /// Fixed poll cadence.
    pub poll_interval_ms: u64,
    /// Extra confirmatory wait after apparent settlement; renewed
    /// activity during this window resumes polling.
    pub confirm_wait_ms: u64,
    /// Hard ceiling on the whole loop, guaranteeing termination even
    /// if the page never truly idles.
    pub max_wait_ms: u64,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            min_elapsed_ms: 15_000,
            idle_threshold_ms: 5_000,
            min_resources: 20,
            poll_interval_ms: 500,
            confirm_wait_ms: 5_000,
            max_wait_ms: 60_000,
        }
    }
}

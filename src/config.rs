//! Run-level configuration, composing the per-crate tunables.

use serde::{Deserialize, Serialize};
use settlement_watch::SettleConfig;
use tool_start::StartPolicyView;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Hard ceiling on navigation; exceeding it is a run-level
    /// failure.
    pub nav_timeout_ms: u64,
    /// Grace period after navigation before looking for the start
    /// control, letting the first paint and early loading happen.
    pub pre_click_grace_ms: u64,
    /// Overall budget for the start resolver (all strategies and
    /// their settle waits).
    pub interaction_budget_ms: u64,
    /// How many of the largest resources the report lists.
    pub top_files: usize,
    pub start: StartPolicyView,
    pub settle: SettleConfig,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            nav_timeout_ms: 60_000,
            pre_click_grace_ms: 3_000,
            interaction_budget_ms: 30_000,
            top_files: 10,
            start: StartPolicyView::default(),
            settle: SettleConfig::default(),
        }
    }
}

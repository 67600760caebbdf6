use std::time::{Duration, Instant};

use canvasprobe_core_types::ActionId;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Execution context delivered by the run orchestrator.
#[derive(Clone, Debug)]
pub struct ExecCtx {
    pub action_id: ActionId,
    pub deadline: Instant,
    pub cancel: CancellationToken,
}

impl ExecCtx {
    pub fn new(action_id: ActionId, deadline: Instant, cancel: CancellationToken) -> Self {
        Self {
            action_id,
            deadline,
            cancel,
        }
    }
}

/// Canvas coordinate normalized to the element's bounding box
/// (0.0..=1.0 on each axis).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelPoint {
    pub x: f32,
    pub y: f32,
}

impl RelPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Interaction strategy, in the order the resolver tries them.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum StrategyKind {
    MultiPositionCanvas,
    RapidMultiClick,
    HtmlOverlayFallback,
}

impl StrategyKind {
    pub fn label(&self) -> &'static str {
        match self {
            StrategyKind::MultiPositionCanvas => "multi-position-canvas",
            StrategyKind::RapidMultiClick => "rapid-multi-click",
            StrategyKind::HtmlOverlayFallback => "html-overlay-fallback",
        }
    }
}

/// Final resolution of the whole run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// A strategy's resource delta exceeded its confirmation threshold.
    Confirmed,
    /// New resources appeared but no strategy crossed its threshold;
    /// the game may have auto-started independent of any click.
    Inconclusive,
    /// No strategy worked and no new resources were observed.
    Failed,
}

/// Outcome of one synthetic input effort.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum AttemptOutcome {
    Confirmed,
    Inconclusive,
    /// The strategy's preconditions were not met (e.g. no canvas
    /// element, no matching overlay text). A soft miss, never fatal.
    NotApplicable,
    /// The driver's evaluation primitive threw; recorded and isolated
    /// to this strategy.
    Faulted(String),
}

/// Where a synthetic input was aimed.
#[derive(Clone, Debug, Serialize)]
pub enum TargetDescriptor {
    Canvas(RelPoint),
    Overlay { tag: String, text: String },
    /// The overlay scan itself, when it matched nothing or faulted.
    DomScan,
}

/// One synthetic input effort at one candidate location/strategy.
/// Immutable once its post-wait observation window elapses.
#[derive(Clone, Debug, Serialize)]
pub struct InteractionAttempt {
    pub strategy: StrategyKind,
    pub target: TargetDescriptor,
    pub count_before: u64,
    pub count_after: u64,
    pub outcome: AttemptOutcome,
}

/// Result of one resolver invocation.
#[derive(Clone, Debug)]
pub struct StartReport {
    pub outcome: Outcome,
    pub winning_strategy: Option<StrategyKind>,
    pub attempts: Vec<InteractionAttempt>,
    pub count_before: u64,
    pub count_after: u64,
    pub started_at: Instant,
    pub finished_at: Instant,
    pub latency_ms: u128,
}

impl StartReport {
    pub fn new(started_at: Instant, count_before: u64) -> Self {
        Self {
            outcome: Outcome::Failed,
            winning_strategy: None,
            attempts: Vec::new(),
            count_before,
            count_after: count_before,
            started_at,
            finished_at: started_at,
            latency_ms: 0,
        }
    }

    pub fn finish(mut self, finished_at: Instant) -> Self {
        self.finished_at = finished_at;
        self.latency_ms = finished_at
            .saturating_duration_since(self.started_at)
            .as_millis();
        self
    }

    /// Newly observed resources across the whole resolver run.
    pub fn delta(&self) -> u64 {
        self.count_after.saturating_sub(self.count_before)
    }
}

/// Helper to convert relative waits to what the deadline still allows.
pub fn remaining_deadline(ctx: &ExecCtx) -> Duration {
    ctx.deadline
        .checked_duration_since(Instant::now())
        .unwrap_or(Duration::ZERO)
}

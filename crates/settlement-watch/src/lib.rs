//! Canvasprobe settlement detector.
//!
//! Decides when to stop waiting and consider a run's resource log
//! complete. The poll-step logic lives in [`SettlementState`] as pure
//! functions over explicit timestamps so it can be unit tested without
//! real timers; [`wait_for_settlement`] is the bounded async loop
//! around it.

pub mod config;

use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

pub use config::SettleConfig;

/// Read access to the observer's cumulative resource count.
///
/// Consumers treat the value as a lower bound during an in-progress
/// wait; at-least-consistent reads are sufficient.
pub trait CountSource: Send + Sync {
    fn current_count(&self) -> u64;
}

/// Poll-step verdict.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    Pending,
    Idle,
}

/// How the settlement loop ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum SettleOutcome {
    /// Idle conditions held through the confirmatory wait.
    Settled,
    /// The hard ceiling elapsed before the page went idle.
    CeilingReached,
    Cancelled,
}

/// Idle-tracking snapshot for one settlement loop.
///
/// `last_activity` only ever advances forward, and only when the
/// snapshot count increases.
#[derive(Clone, Copy, Debug)]
pub struct SettlementState {
    started_at: Instant,
    last_activity: Instant,
    snapshot_count: u64,
}

impl SettlementState {
    pub fn new(now: Instant) -> Self {
        Self {
            started_at: now,
            last_activity: now,
            snapshot_count: 0,
        }
    }

    /// Fold one observed count into the state.
    pub fn observe(mut self, count: u64, now: Instant) -> Self {
        if count > self.snapshot_count {
            self.snapshot_count = count;
            self.last_activity = now;
        }
        self
    }

    pub fn verdict(&self, now: Instant, config: &SettleConfig) -> Verdict {
        let elapsed = now.saturating_duration_since(self.started_at);
        let idle = now.saturating_duration_since(self.last_activity);
        let settled = elapsed >= Duration::from_millis(config.min_elapsed_ms)
            && idle >= Duration::from_millis(config.idle_threshold_ms)
            && self.snapshot_count >= config.min_resources;
        if settled {
            Verdict::Idle
        } else {
            Verdict::Pending
        }
    }

    pub fn snapshot_count(&self) -> u64 {
        self.snapshot_count
    }

    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }
}

/// Poll the counter until the page settles, the ceiling elapses, or
/// the run is cancelled. Always terminates.
#[instrument(skip_all)]
pub async fn wait_for_settlement(
    counter: &dyn CountSource,
    config: &SettleConfig,
    cancel: &CancellationToken,
) -> SettleOutcome {
    let started = Instant::now();
    let deadline = started + Duration::from_millis(config.max_wait_ms);
    let mut state = SettlementState::new(started);
    let mut ticker = interval(Duration::from_millis(config.poll_interval_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return SettleOutcome::Cancelled,
            _ = ticker.tick() => {}
        }

        let now = Instant::now();
        if now >= deadline {
            warn!(
                resources = state.snapshot_count(),
                "settlement ceiling reached before the page went idle"
            );
            return SettleOutcome::CeilingReached;
        }

        state = state.observe(counter.current_count(), now);
        if state.verdict(now, config) == Verdict::Pending {
            continue;
        }

        // Apparent settlement: confirm with one extra wait, bounded
        // by whatever remains of the ceiling.
        debug!(
            resources = state.snapshot_count(),
            idle_ms = state.idle_for(now).as_millis() as u64,
            "network idle detected, verifying"
        );
        let before = state.snapshot_count();
        let confirm = Duration::from_millis(config.confirm_wait_ms)
            .min(deadline.saturating_duration_since(now));
        tokio::select! {
            _ = cancel.cancelled() => return SettleOutcome::Cancelled,
            _ = sleep(confirm) => {}
        }

        let after = counter.current_count();
        if after > before {
            debug!(new = after - before, "activity resumed during confirmation");
            state = state.observe(after, Instant::now());
            continue;
        }

        debug!(resources = after, "settlement confirmed");
        return SettleOutcome::Settled;
    }
}

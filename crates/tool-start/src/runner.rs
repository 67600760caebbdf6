use std::time::{Duration, Instant};

use canvasprobe_core_types::ProbeError;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

use crate::errors::StartError;
use crate::model::{
    remaining_deadline, AttemptOutcome, ExecCtx, InteractionAttempt, Outcome, RelPoint,
    StartReport, StrategyKind, TargetDescriptor,
};
use crate::policy::StartPolicyView;
use crate::ports::{CounterPort, EventsPort, SurfacePort};

#[derive(Clone, Copy)]
pub struct RuntimeDeps<'a> {
    pub surface: &'a dyn SurfacePort,
    pub counter: &'a dyn CounterPort,
    pub events: &'a dyn EventsPort,
    pub policy: &'a StartPolicyView,
}

/// Run the strategy sequence until one confirms or all are exhausted.
///
/// Strategy-local faults never escalate: a port error is recorded as a
/// `Faulted` attempt and the next strategy runs. The only `Err` path
/// out of here is run cancellation.
#[instrument(skip_all, fields(action = %ctx.action_id.0))]
pub async fn execute(ctx: &ExecCtx, deps: RuntimeDeps<'_>) -> Result<StartReport, ProbeError> {
    deps.events.emit_started(&ctx.action_id).await;
    let baseline = deps.counter.current_count();
    let mut report = StartReport::new(Instant::now(), baseline);

    // Strategy 1: walk the candidate positions, short-circuiting on
    // the first confirmed one.
    for point in &deps.policy.canvas_positions {
        if out_of_time(ctx) {
            break;
        }
        let attempt = canvas_attempt(
            ctx,
            &deps,
            *point,
            1,
            deps.policy.waits.canvas_settle(),
            baseline,
            StrategyKind::MultiPositionCanvas,
        )
        .await?;
        let outcome = attempt.outcome.clone();
        deps.events.emit_attempt(&ctx.action_id, &attempt).await;
        report.attempts.push(attempt);
        match outcome {
            AttemptOutcome::Confirmed => {
                return finalize(ctx, &deps, report, Some(StrategyKind::MultiPositionCanvas)).await;
            }
            // No canvas: the remaining positions are equally inapplicable.
            AttemptOutcome::NotApplicable => break,
            _ => {}
        }
    }

    // Strategy 2: rapid repeated clicks at the most common location,
    // for frameworks that need multiple activations to register a
    // first user gesture.
    if !out_of_time(ctx) {
        let attempt = canvas_attempt(
            ctx,
            &deps,
            deps.policy.rapid_point,
            deps.policy.rapid_clicks.max(1),
            deps.policy.waits.rapid_settle(),
            baseline,
            StrategyKind::RapidMultiClick,
        )
        .await?;
        let outcome = attempt.outcome.clone();
        deps.events.emit_attempt(&ctx.action_id, &attempt).await;
        report.attempts.push(attempt);
        if outcome == AttemptOutcome::Confirmed {
            return finalize(ctx, &deps, report, Some(StrategyKind::RapidMultiClick)).await;
        }
    }

    // Strategy 3: DOM overlay scan, last because it is the most
    // expensive and contradicts the canvas-only assumption.
    if !out_of_time(ctx) {
        let attempt = overlay_attempt(ctx, &deps, baseline).await?;
        let outcome = attempt.outcome.clone();
        deps.events.emit_attempt(&ctx.action_id, &attempt).await;
        report.attempts.push(attempt);
        if outcome == AttemptOutcome::Confirmed {
            return finalize(ctx, &deps, report, Some(StrategyKind::HtmlOverlayFallback)).await;
        }
    }

    finalize(ctx, &deps, report, None).await
}

async fn canvas_attempt(
    ctx: &ExecCtx,
    deps: &RuntimeDeps<'_>,
    point: RelPoint,
    repeat: u8,
    settle: Duration,
    baseline: u64,
    strategy: StrategyKind,
) -> Result<InteractionAttempt, ProbeError> {
    let target = TargetDescriptor::Canvas(point);
    match deps.surface.click_canvas(point, repeat).await {
        Ok(dispatch) if !dispatch.applicable => {
            debug!(strategy = strategy.label(), "no canvas element present");
            Ok(attempt(
                strategy,
                target,
                baseline,
                deps.counter.current_count(),
                AttemptOutcome::NotApplicable,
            ))
        }
        Ok(dispatch) => {
            debug!(
                strategy = strategy.label(),
                x = point.x,
                y = point.y,
                pixel = ?dispatch.pixel,
                repeat,
                "dispatched synthetic click sequence"
            );
            settle_wait(ctx, settle).await?;
            let after = deps.counter.current_count();
            let delta = after.saturating_sub(baseline);
            let threshold = deps.policy.canvas_confirm_threshold;
            debug!(
                strategy = strategy.label(),
                delta, threshold, "post-click resource delta"
            );
            let outcome = if delta > threshold {
                AttemptOutcome::Confirmed
            } else {
                AttemptOutcome::Inconclusive
            };
            Ok(attempt(strategy, target, baseline, after, outcome))
        }
        Err(err) => {
            warn!(strategy = strategy.label(), error = %err, "canvas dispatch failed");
            Ok(attempt(
                strategy,
                target,
                baseline,
                deps.counter.current_count(),
                AttemptOutcome::Faulted(err.to_string()),
            ))
        }
    }
}

async fn overlay_attempt(
    ctx: &ExecCtx,
    deps: &RuntimeDeps<'_>,
    baseline: u64,
) -> Result<InteractionAttempt, ProbeError> {
    let strategy = StrategyKind::HtmlOverlayFallback;
    match deps.surface.click_overlay(&deps.policy.start_phrases).await {
        Ok(Some(hit)) => {
            debug!(tag = %hit.tag, text = %hit.text, "activated overlay element");
            settle_wait(ctx, deps.policy.waits.overlay_settle()).await?;
            let after = deps.counter.current_count();
            let delta = after.saturating_sub(baseline);
            let outcome = if delta > deps.policy.overlay_confirm_threshold {
                AttemptOutcome::Confirmed
            } else {
                AttemptOutcome::Inconclusive
            };
            Ok(attempt(
                strategy,
                TargetDescriptor::Overlay {
                    tag: hit.tag,
                    text: hit.text,
                },
                baseline,
                after,
                outcome,
            ))
        }
        Ok(None) => {
            debug!("no visible start overlay matched");
            Ok(attempt(
                strategy,
                TargetDescriptor::DomScan,
                baseline,
                deps.counter.current_count(),
                AttemptOutcome::NotApplicable,
            ))
        }
        Err(err) => {
            warn!(error = %err, "overlay scan failed");
            Ok(attempt(
                strategy,
                TargetDescriptor::DomScan,
                baseline,
                deps.counter.current_count(),
                AttemptOutcome::Faulted(err.to_string()),
            ))
        }
    }
}

async fn finalize(
    ctx: &ExecCtx,
    deps: &RuntimeDeps<'_>,
    mut report: StartReport,
    winner: Option<StrategyKind>,
) -> Result<StartReport, ProbeError> {
    report.count_after = deps.counter.current_count();
    report.winning_strategy = winner;
    report.outcome = match winner {
        Some(_) => Outcome::Confirmed,
        None if report.delta() > 0 => Outcome::Inconclusive,
        None => Outcome::Failed,
    };
    let report = report.finish(Instant::now());
    debug!(
        outcome = ?report.outcome,
        strategy = report.winning_strategy.map(|s| s.label()),
        delta = report.delta(),
        "start resolution complete"
    );
    deps.events.emit_resolved(&ctx.action_id, &report).await;
    Ok(report)
}

fn attempt(
    strategy: StrategyKind,
    target: TargetDescriptor,
    count_before: u64,
    count_after: u64,
    outcome: AttemptOutcome,
) -> InteractionAttempt {
    InteractionAttempt {
        strategy,
        target,
        count_before,
        count_after,
        outcome,
    }
}

async fn settle_wait(ctx: &ExecCtx, want: Duration) -> Result<(), ProbeError> {
    let bounded = want.min(remaining_deadline(ctx));
    tokio::select! {
        _ = ctx.cancel.cancelled() => Err(StartError::Cancelled.into()),
        _ = sleep(bounded) => Ok(()),
    }
}

fn out_of_time(ctx: &ExecCtx) -> bool {
    remaining_deadline(ctx).is_zero()
}

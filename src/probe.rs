//! Probe run orchestration: navigate, resolve the start control,
//! wait for settlement, assemble the report.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use canvasprobe_core_types::{ActionId, ProbeError, RunId};
use resource_observer::ResourceLog;
use settlement_watch::wait_for_settlement;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tool_start::ports::SurfacePort;
use tool_start::{ExecCtx, StartTool, StartToolBuilder};
use tracing::{debug, info, instrument};

use crate::adapters::LogCounter;
use crate::config::ProbeConfig;
use crate::report::ProbeReport;

/// Navigation capability supplied by the automation driver.
#[async_trait]
pub trait NavigatorPort: Send + Sync {
    /// Navigate the page and return once the driver's load criterion
    /// (e.g. network-idle) is met.
    async fn navigate(&self, url: &str) -> Result<(), ProbeError>;
}

/// Execute one full probe run against `url`.
///
/// The driver adapter must already be feeding network events into
/// `log`. Navigation timeout and driver-launch faults are the only
/// run-level errors; everything downstream degrades into the report.
#[instrument(skip_all, fields(url = %url))]
pub async fn run_probe(
    navigator: &dyn NavigatorPort,
    surface: Arc<dyn SurfacePort>,
    log: Arc<ResourceLog>,
    config: &ProbeConfig,
    url: &str,
    cancel: CancellationToken,
) -> Result<ProbeReport, ProbeError> {
    let run_id = RunId::new();
    let started = Instant::now();
    info!(run = %run_id, "starting game load probe");

    match timeout(
        Duration::from_millis(config.nav_timeout_ms),
        navigator.navigate(url),
    )
    .await
    {
        Err(_) => return Err(ProbeError::NavigationTimeout(config.nav_timeout_ms)),
        Ok(result) => result?,
    }
    let navigation_ms = started.elapsed().as_millis() as u64;
    info!(navigation_ms, "page navigation complete");

    // Let the first paint and early loading happen before hunting for
    // the start control.
    tokio::select! {
        _ = cancel.cancelled() => return Err(ProbeError::Cancelled),
        _ = sleep(Duration::from_millis(config.pre_click_grace_ms)) => {}
    }

    let counter = LogCounter(Arc::clone(&log));
    let tool = StartToolBuilder::new(config.start.clone())
        .with_surface(surface)
        .with_counter(Arc::new(counter.clone()))
        .build();
    let ctx = ExecCtx::new(
        ActionId::new(),
        Instant::now() + Duration::from_millis(config.interaction_budget_ms),
        cancel.clone(),
    );
    let start_report = tool.run(ctx).await?;
    debug!(outcome = ?start_report.outcome, "start resolution finished");

    let settlement = wait_for_settlement(&counter, &config.settle, &cancel).await;
    info!(?settlement, resources = log.current_count(), "resource loading settled");

    Ok(ProbeReport::assemble(
        url,
        run_id,
        started,
        navigation_ms,
        &log,
        start_report,
        settlement,
        config.top_files,
    ))
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use canvasprobe_core_types::ProbeError;
use canvasprobe::probe::{run_probe, NavigatorPort};
use canvasprobe::ProbeConfig;
use resource_observer::{ResourceLog, ResponseEvidence};
use settlement_watch::{SettleConfig, SettleOutcome};
use tokio_util::sync::CancellationToken;
use tool_start::ports::{ClickDispatch, OverlayHit, SurfacePort};
use tool_start::{Outcome, RelPoint, StartPolicyView, StartWaits, StrategyKind};

struct InstantNavigator;

#[async_trait]
impl NavigatorPort for InstantNavigator {
    async fn navigate(&self, _url: &str) -> Result<(), ProbeError> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok(())
    }
}

struct SlowNavigator;

#[async_trait]
impl NavigatorPort for SlowNavigator {
    async fn navigate(&self, _url: &str) -> Result<(), ProbeError> {
        tokio::time::sleep(Duration::from_millis(500)).await;
        Ok(())
    }
}

/// Surface whose nth canvas click makes the game load a resource burst.
struct GameSurface {
    log: Arc<ResourceLog>,
    unlock_on_click: usize,
    burst: usize,
    clicks: AtomicUsize,
}

#[async_trait]
impl SurfacePort for GameSurface {
    async fn click_canvas(&self, _point: RelPoint, _repeat: u8) -> Result<ClickDispatch, ProbeError> {
        let nth = self.clicks.fetch_add(1, Ordering::SeqCst) + 1;
        if nth == self.unlock_on_click {
            for i in 0..self.burst {
                self.log.record_response(ResponseEvidence {
                    url: format!("https://cdn.example/scene/asset{i}.png"),
                    status: Some(200),
                    decoded_body_len: Some(1_024),
                    ..ResponseEvidence::default()
                });
            }
        }
        Ok(ClickDispatch {
            applicable: true,
            pixel: Some((640, 432)),
        })
    }

    async fn click_overlay(&self, _phrases: &[String]) -> Result<Option<OverlayHit>, ProbeError> {
        Ok(None)
    }
}

fn fast_config() -> ProbeConfig {
    ProbeConfig {
        nav_timeout_ms: 1_000,
        pre_click_grace_ms: 10,
        interaction_budget_ms: 2_000,
        top_files: 10,
        start: StartPolicyView {
            waits: StartWaits {
                canvas_settle_ms: 10,
                rapid_settle_ms: 10,
                overlay_settle_ms: 10,
            },
            ..StartPolicyView::default()
        },
        settle: SettleConfig {
            min_elapsed_ms: 80,
            idle_threshold_ms: 40,
            min_resources: 5,
            poll_interval_ms: 10,
            confirm_wait_ms: 30,
            max_wait_ms: 2_000,
        },
    }
}

fn seed_navigation_resources(log: &ResourceLog) {
    for (url, size) in [
        ("https://game.example/index.html", 4_000u64),
        ("https://game.example/main.css", 2_000),
        ("https://game.example/loader.js", 80_000),
    ] {
        log.record_response(ResponseEvidence {
            url: url.into(),
            status: Some(200),
            decoded_body_len: Some(size),
            ..ResponseEvidence::default()
        });
    }
}

#[tokio::test]
async fn full_run_confirms_click_and_settles() {
    let log = Arc::new(ResourceLog::new());
    seed_navigation_resources(&log);
    let surface = Arc::new(GameSurface {
        log: Arc::clone(&log),
        unlock_on_click: 2,
        burst: 6,
        clicks: AtomicUsize::new(0),
    });

    let report = run_probe(
        &InstantNavigator,
        surface,
        Arc::clone(&log),
        &fast_config(),
        "https://game.example/play?token=abc",
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.resolution.outcome, Outcome::Confirmed);
    assert_eq!(
        report.resolution.winning_strategy,
        Some(StrategyKind::MultiPositionCanvas)
    );
    assert_eq!(report.settlement, SettleOutcome::Settled);
    assert_eq!(report.total_resources, 9);
    assert_eq!(report.resolution.new_resources, 6);
    assert!(!report.by_kind.is_empty());
    assert!(report.failed.is_empty());
    assert!(report.largest[0].bytes >= report.largest[1].bytes);
}

#[tokio::test]
async fn auto_starting_game_resolves_inconclusive() {
    let log = Arc::new(ResourceLog::new());
    seed_navigation_resources(&log);
    // Clicks never unlock anything; the game trickles resources on
    // its own while the resolver is working.
    let surface = Arc::new(GameSurface {
        log: Arc::clone(&log),
        unlock_on_click: usize::MAX,
        burst: 0,
        clicks: AtomicUsize::new(0),
    });
    let feeder = {
        let log = Arc::clone(&log);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            log.record_response(ResponseEvidence {
                url: "https://cdn.example/auto/boot.json".into(),
                status: Some(200),
                decoded_body_len: Some(256),
                ..ResponseEvidence::default()
            });
            log.record_response(ResponseEvidence {
                url: "https://cdn.example/auto/stage.js".into(),
                status: Some(200),
                decoded_body_len: Some(512),
                ..ResponseEvidence::default()
            });
        })
    };

    let report = run_probe(
        &InstantNavigator,
        surface,
        Arc::clone(&log),
        &fast_config(),
        "https://game.example/play",
        CancellationToken::new(),
    )
    .await
    .unwrap();
    feeder.await.unwrap();

    assert_eq!(report.resolution.outcome, Outcome::Inconclusive);
    assert!(report.resolution.winning_strategy.is_none());
    assert_eq!(report.settlement, SettleOutcome::Settled);
    assert_eq!(report.total_resources, 5);
}

#[tokio::test]
async fn navigation_overrun_is_a_run_level_failure() {
    let log = Arc::new(ResourceLog::new());
    let surface = Arc::new(GameSurface {
        log: Arc::clone(&log),
        unlock_on_click: usize::MAX,
        burst: 0,
        clicks: AtomicUsize::new(0),
    });
    let config = ProbeConfig {
        nav_timeout_ms: 50,
        ..fast_config()
    };

    let err = run_probe(
        &SlowNavigator,
        surface,
        log,
        &config,
        "https://game.example/play",
        CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ProbeError::NavigationTimeout(50)));
}

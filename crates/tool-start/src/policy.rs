use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::RelPoint;

/// Resolver tunables.
///
/// The confirmation thresholds are strict lower bounds (`delta >
/// threshold`). The canvas threshold separates noise from "a new
/// scene/bundle began loading"; 3 is empirical, not validated intent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StartPolicyView {
    /// Candidate canvas positions, ordered by empirical likelihood of
    /// hosting a centered-but-vertically-offset start button.
    pub canvas_positions: Vec<RelPoint>,
    /// Fixed position for the rapid-click strategy.
    pub rapid_point: RelPoint,
    /// Back-to-back repetitions for the rapid-click strategy; some UI
    /// frameworks need repeated activation to register a first
    /// user-gesture unlock.
    pub rapid_clicks: u8,
    pub canvas_confirm_threshold: u64,
    /// Lower threshold for the HTML fallback: a native activation is
    /// a more direct signal.
    pub overlay_confirm_threshold: u64,
    /// Case-insensitive start-button phrases for the DOM scan.
    pub start_phrases: Vec<String>,
    pub waits: StartWaits,
}

impl Default for StartPolicyView {
    fn default() -> Self {
        Self {
            canvas_positions: vec![
                RelPoint::new(0.5, 0.5),
                RelPoint::new(0.5, 0.6),
                RelPoint::new(0.5, 0.7),
                RelPoint::new(0.5, 0.4),
            ],
            rapid_point: RelPoint::new(0.5, 0.6),
            rapid_clicks: 3,
            canvas_confirm_threshold: 3,
            overlay_confirm_threshold: 0,
            start_phrases: [
                "CLICK TO PLAY",
                "START",
                "PLAY",
                "開始",
                "播放",
                "TAP TO START",
                "CLICK TO START",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            waits: StartWaits::default(),
        }
    }
}

/// Settle intervals granted after each dispatch for triggered loading
/// to begin.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StartWaits {
    pub canvas_settle_ms: u64,
    pub rapid_settle_ms: u64,
    pub overlay_settle_ms: u64,
}

impl StartWaits {
    pub fn canvas_settle(&self) -> Duration {
        Duration::from_millis(self.canvas_settle_ms)
    }

    pub fn rapid_settle(&self) -> Duration {
        Duration::from_millis(self.rapid_settle_ms)
    }

    pub fn overlay_settle(&self) -> Duration {
        Duration::from_millis(self.overlay_settle_ms)
    }
}

impl Default for StartWaits {
    fn default() -> Self {
        Self {
            canvas_settle_ms: 2_000,
            rapid_settle_ms: 3_000,
            overlay_settle_ms: 3_000,
        }
    }
}

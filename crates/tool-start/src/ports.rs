use async_trait::async_trait;
use canvasprobe_core_types::{ActionId, ProbeError};

use crate::model::{InteractionAttempt, RelPoint, StartReport};

/// Result of dispatching a synthetic click sequence at the canvas.
#[derive(Clone, Debug, Default)]
pub struct ClickDispatch {
    /// False when the page exposes no canvas element. A soft miss,
    /// not an error.
    pub applicable: bool,
    /// Viewport pixel the sequence was dispatched at, when resolved
    /// from the canvas bounding box.
    pub pixel: Option<(i32, i32)>,
}

/// A visible DOM element the overlay fallback activated.
#[derive(Clone, Debug)]
pub struct OverlayHit {
    pub tag: String,
    pub text: String,
}

/// In-page dispatch capability supplied by the automation driver.
///
/// Implementations run inside the page context and must tolerate the
/// page navigating away mid-call; such faults surface as `Err` and are
/// isolated to the strategy that triggered them.
#[async_trait]
pub trait SurfacePort: Send + Sync {
    /// Dispatch a pointer-down/pointer-up plus mouse-down/mouse-up/
    /// click sequence at the pixel derived from the canvas bounding
    /// box and `point`, repeated `repeat` times back to back.
    async fn click_canvas(&self, point: RelPoint, repeat: u8) -> Result<ClickDispatch, ProbeError>;

    /// Scan the DOM for visible elements whose text or alt attribute
    /// matches one of `phrases` (case-insensitive), preferring
    /// semantic buttons, and invoke the first match's native
    /// activation. `None` when nothing matched.
    async fn click_overlay(&self, phrases: &[String]) -> Result<Option<OverlayHit>, ProbeError>;
}

/// Read access to the observer's cumulative resource count. Reads are
/// treated as lower bounds while loading is in progress.
pub trait CounterPort: Send + Sync {
    fn current_count(&self) -> u64;
}

/// Lifecycle notifications for observability layers.
#[async_trait]
pub trait EventsPort: Send + Sync {
    async fn emit_started(&self, action: &ActionId);
    async fn emit_attempt(&self, action: &ActionId, attempt: &InteractionAttempt);
    async fn emit_resolved(&self, action: &ActionId, report: &StartReport);
}

use async_trait::async_trait;
use canvasprobe_core_types::ActionId;

use crate::model::{InteractionAttempt, StartReport};
use crate::ports::EventsPort;

/// Default sink when no observability layer is wired in.
#[derive(Clone, Debug, Default)]
pub struct NoopEvents;

#[async_trait]
impl EventsPort for NoopEvents {
    async fn emit_started(&self, _action: &ActionId) {}
    async fn emit_attempt(&self, _action: &ActionId, _attempt: &InteractionAttempt) {}
    async fn emit_resolved(&self, _action: &ActionId, _report: &StartReport) {}
}

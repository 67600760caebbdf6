use std::sync::Arc;

use async_trait::async_trait;
use canvasprobe_core_types::ProbeError;

use crate::errors::StartError;
use crate::events::NoopEvents;
use crate::model::{ExecCtx, StartReport};
use crate::policy::StartPolicyView;
use crate::ports::{CounterPort, EventsPort, SurfacePort};
use crate::runner::{execute, RuntimeDeps};

#[async_trait]
pub trait StartTool: Send + Sync {
    async fn run(&self, ctx: ExecCtx) -> Result<StartReport, ProbeError>;
}

pub struct StartToolBuilder {
    policy: StartPolicyView,
    surface: Option<Arc<dyn SurfacePort>>,
    counter: Option<Arc<dyn CounterPort>>,
    events: Option<Arc<dyn EventsPort>>,
}

impl StartToolBuilder {
    pub fn new(policy: StartPolicyView) -> Self {
        Self {
            policy,
            surface: None,
            counter: None,
            events: None,
        }
    }

    pub fn with_surface(mut self, port: Arc<dyn SurfacePort>) -> Self {
        self.surface = Some(port);
        self
    }

    pub fn with_counter(mut self, port: Arc<dyn CounterPort>) -> Self {
        self.counter = Some(port);
        self
    }

    pub fn with_events(mut self, port: Arc<dyn EventsPort>) -> Self {
        self.events = Some(port);
        self
    }

    pub fn build(self) -> Arc<dyn StartTool> {
        Arc::new(StartToolImpl {
            policy: self.policy,
            surface: self.surface.expect("surface port is required"),
            counter: self.counter.expect("counter port is required"),
            events: self.events.unwrap_or_else(|| Arc::new(NoopEvents)),
        })
    }
}

pub struct StartToolImpl {
    policy: StartPolicyView,
    surface: Arc<dyn SurfacePort>,
    counter: Arc<dyn CounterPort>,
    events: Arc<dyn EventsPort>,
}

#[async_trait]
impl StartTool for StartToolImpl {
    async fn run(&self, ctx: ExecCtx) -> Result<StartReport, ProbeError> {
        if ctx.cancel.is_cancelled() {
            return Err(StartError::Cancelled.into());
        }
        let runtime = RuntimeDeps {
            surface: self.surface.as_ref(),
            counter: self.counter.as_ref(),
            events: self.events.as_ref(),
            policy: &self.policy,
        };
        execute(&ctx, runtime).await
    }
}

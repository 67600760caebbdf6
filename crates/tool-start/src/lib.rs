//! Canvasprobe start-control resolver.
//!
//! Locates and activates a "click to start" control for a
//! canvas-rendered game where no DOM element reliably represents it.
//! Strategies run from least to most invasive, each validated by the
//! delta in newly-observed network resources, since canvas-internal
//! UI state offers no direct feedback.

pub mod api;
pub mod errors;
pub mod model;
pub mod policy;
pub mod ports;

mod events;
mod runner;

pub use api::{StartTool, StartToolBuilder};
pub use model::{
    AttemptOutcome, ExecCtx, InteractionAttempt, Outcome, RelPoint, StartReport, StrategyKind,
    TargetDescriptor,
};
pub use policy::{StartPolicyView, StartWaits};

//! Canvasprobe: resource-loading and start-interaction probe for
//! canvas-rendered games.
//!
//! A probe run drives one browser page (supplied by an external
//! automation driver through the port traits) against a game URL:
//! it records every network resource the driver reports, attempts to
//! activate the game's "click to start" control through a sequence of
//! synthetic-input strategies, waits for network settlement, and
//! produces a [`report::ProbeReport`].
//!
//! The driver itself (CDP transport, navigation, in-page evaluation)
//! is not implemented here; embedders wire their driver into
//! [`probe::NavigatorPort`] and [`tool_start::ports::SurfacePort`]
//! and feed network events into [`resource_observer::ResourceLog`].

pub mod adapters;
pub mod config;
pub mod probe;
pub mod report;

pub use config::ProbeConfig;
pub use probe::{run_probe, NavigatorPort};
pub use report::ProbeReport;

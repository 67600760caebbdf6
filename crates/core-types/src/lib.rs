//! Shared primitives for the canvasprobe workspace: run-scoped
//! identifiers and the error type every tool error converts into.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Workspace-wide error type.
///
/// Strategy-local faults are caught and recorded where they occur;
/// only run-level failures (navigation timeout, driver loss,
/// cancellation) propagate as `ProbeError` out of a run.
#[derive(Debug, Error, Clone)]
pub enum ProbeError {
    #[error("driver fault: {0}")]
    Driver(String),
    #[error("navigation did not complete within {0} ms")]
    NavigationTimeout(u64),
    #[error("run cancelled")]
    Cancelled,
    #[error("{message}")]
    Message { message: String },
}

impl ProbeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    pub fn driver(reason: impl Into<String>) -> Self {
        Self::Driver(reason.into())
    }
}

/// Identifier for one probe run (one browser page, one resource log).
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for one resolver invocation within a run.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(RunId::new(), RunId::new());
        assert_ne!(ActionId::new(), ActionId::new());
    }

    #[test]
    fn error_display_carries_message() {
        let err = ProbeError::new("context destroyed");
        assert_eq!(err.to_string(), "context destroyed");
        let err = ProbeError::NavigationTimeout(60_000);
        assert!(err.to_string().contains("60000 ms"));
    }
}

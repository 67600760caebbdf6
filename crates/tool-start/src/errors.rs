use thiserror::Error;

use canvasprobe_core_types::ProbeError;

#[derive(Debug, Error)]
pub enum StartError {
    #[error("operation cancelled")]
    Cancelled,
}

impl From<StartError> for ProbeError {
    fn from(err: StartError) -> Self {
        match err {
            StartError::Cancelled => ProbeError::Cancelled,
        }
    }
}

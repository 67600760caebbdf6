//! Evidence structs handed to the log by a driver adapter.
//!
//! An adapter translates the driver's network callbacks
//! (`Network.responseReceived`, `Network.loadingFailed` or their
//! equivalents) into these shapes. Every field except the URL is
//! optional on purpose: partial evidence degrades the measurement,
//! it never aborts the run.

/// One completed network exchange as reported by the driver.
#[derive(Clone, Debug, Default)]
pub struct ResponseEvidence {
    pub url: String,
    pub status: Option<u16>,
    pub mime_type: Option<String>,
    /// Length of the decoded response body, when the driver could
    /// retrieve it. Preferred over the transfer length because
    /// reporting is about logical payload weight, not bandwidth.
    pub decoded_body_len: Option<u64>,
    /// Encoded (compressed) transfer length, when known.
    pub transfer_len: Option<u64>,
    pub from_cache: bool,
}

/// One failed network exchange.
#[derive(Clone, Debug, Default)]
pub struct FailureEvidence {
    pub url: String,
    pub reason: String,
}

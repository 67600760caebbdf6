//! Canvasprobe resource observer.
//!
//! Maintains the authoritative, append-only log of network resources
//! observed during one probe run. Appends arrive from the driver's
//! event-delivery context while the resolver and the settlement loop
//! read counts concurrently; appends are atomic single-record
//! insertions behind a lock, so reads always observe a monotonically
//! growing sequence.

pub mod evidence;
pub mod kind;

use std::collections::BTreeMap;
use std::time::Instant;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;

pub use evidence::{FailureEvidence, ResponseEvidence};
pub use kind::ResourceKind;

/// Where a record's `byte_size` came from, in decreasing confidence.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum SizeSource {
    /// Actual decoded body length.
    DecodedBody,
    /// Encoded transfer length; body retrieval failed or was skipped.
    TransferLength,
    /// Neither was available; size recorded as zero.
    Unknown,
}

/// One observed network exchange. Never mutated after insertion.
#[derive(Clone, Debug, Serialize)]
pub struct ResourceRecord {
    pub url: String,
    pub status: Option<u16>,
    pub kind: ResourceKind,
    pub byte_size: u64,
    pub size_source: SizeSource,
    pub encoded_size: u64,
    pub mime_type: Option<String>,
    /// Milliseconds since the log was created, per observation order.
    pub observed_offset_ms: u64,
    pub from_cache: bool,
    pub failure: Option<String>,
    #[serde(skip)]
    pub observed_at: Instant,
}

impl ResourceRecord {
    pub fn failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// Per-kind aggregate used by the report layer.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct KindTotals {
    pub count: u64,
    pub bytes: u64,
    pub encoded_bytes: u64,
}

/// Append-only log of resource records for the lifetime of one run.
pub struct ResourceLog {
    started_at: Instant,
    records: RwLock<Vec<ResourceRecord>>,
}

impl ResourceLog {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            records: RwLock::new(Vec::new()),
        }
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Append a record for a completed exchange.
    ///
    /// There is no error path: missing or malformed evidence yields a
    /// record with zeroed/unknown fields, because losing one
    /// resource's metadata must never abort the run.
    pub fn record_response(&self, evidence: ResponseEvidence) {
        let (byte_size, size_source) = match (evidence.decoded_body_len, evidence.transfer_len) {
            (Some(len), _) => (len, SizeSource::DecodedBody),
            (None, Some(len)) => {
                debug!(url = %evidence.url, "body unavailable, falling back to transfer length");
                (len, SizeSource::TransferLength)
            }
            (None, None) => {
                debug!(url = %evidence.url, "no size evidence, recording zero");
                (0, SizeSource::Unknown)
            }
        };
        let now = Instant::now();
        let record = ResourceRecord {
            kind: ResourceKind::from_url(&evidence.url),
            url: evidence.url,
            status: evidence.status,
            byte_size,
            size_source,
            encoded_size: evidence.transfer_len.unwrap_or(0),
            mime_type: evidence.mime_type,
            observed_offset_ms: self.offset_ms(now),
            from_cache: evidence.from_cache,
            failure: None,
            observed_at: now,
        };
        self.records.write().push(record);
    }

    /// Append a record for a failed exchange with its error reason.
    pub fn record_failure(&self, evidence: FailureEvidence) {
        let now = Instant::now();
        let record = ResourceRecord {
            kind: ResourceKind::from_url(&evidence.url),
            url: evidence.url,
            status: None,
            byte_size: 0,
            size_source: SizeSource::Unknown,
            encoded_size: 0,
            mime_type: None,
            observed_offset_ms: self.offset_ms(now),
            from_cache: false,
            failure: Some(evidence.reason),
            observed_at: now,
        };
        self.records.write().push(record);
    }

    /// Number of records observed so far. Non-decreasing over time and
    /// equal to the number of append calls made.
    pub fn current_count(&self) -> u64 {
        self.records.read().len() as u64
    }

    /// Sum of best-effort decoded sizes across all records.
    pub fn total_bytes(&self) -> u64 {
        self.records.read().iter().map(|r| r.byte_size).sum()
    }

    /// Sum of encoded transfer lengths across all records.
    pub fn total_encoded_bytes(&self) -> u64 {
        self.records.read().iter().map(|r| r.encoded_size).sum()
    }

    pub fn from_cache_count(&self) -> u64 {
        self.records.read().iter().filter(|r| r.from_cache).count() as u64
    }

    /// Number of records whose size had to be degraded below the
    /// decoded-body measurement.
    pub fn degraded_count(&self) -> u64 {
        self.records
            .read()
            .iter()
            .filter(|r| !r.failed() && r.size_source != SizeSource::DecodedBody)
            .count() as u64
    }

    /// Snapshot clone of the full log, in observation order.
    pub fn records(&self) -> Vec<ResourceRecord> {
        self.records.read().clone()
    }

    pub fn failed(&self) -> Vec<ResourceRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.failed())
            .cloned()
            .collect()
    }

    /// Aggregate successful records by kind.
    pub fn totals_by_kind(&self) -> BTreeMap<ResourceKind, KindTotals> {
        let mut totals: BTreeMap<ResourceKind, KindTotals> = BTreeMap::new();
        for record in self.records.read().iter().filter(|r| !r.failed()) {
            let entry = totals.entry(record.kind).or_default();
            entry.count += 1;
            entry.bytes += record.byte_size;
            entry.encoded_bytes += record.encoded_size;
        }
        totals
    }

    fn offset_ms(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.started_at).as_millis() as u64
    }
}

impl Default for ResourceLog {
    fn default() -> Self {
        Self::new()
    }
}

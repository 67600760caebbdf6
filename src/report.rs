//! Final run report: aggregates, breakdowns and a plain-text summary.

use std::time::Instant;

use canvasprobe_core_types::RunId;
use chrono::{DateTime, Utc};
use resource_observer::{ResourceKind, ResourceLog};
use serde::Serialize;
use settlement_watch::SettleOutcome;
use tool_start::{InteractionAttempt, Outcome, StartReport, StrategyKind};

const DISPLAY_NAME_MAX: usize = 50;

#[derive(Clone, Debug, Serialize)]
pub struct ProbeReport {
    pub url: String,
    pub run_id: RunId,
    pub generated_at: DateTime<Utc>,
    pub navigation_ms: u64,
    pub total_ms: u64,
    pub total_resources: u64,
    pub total_bytes: u64,
    pub total_encoded_bytes: u64,
    pub from_cache: u64,
    pub degraded_measurements: u64,
    pub by_kind: Vec<KindBreakdown>,
    pub failed: Vec<FailedRequest>,
    pub largest: Vec<LargestEntry>,
    pub resolution: Resolution,
    pub settlement: SettleOutcome,
}

#[derive(Clone, Debug, Serialize)]
pub struct KindBreakdown {
    pub kind: ResourceKind,
    pub label: &'static str,
    pub count: u64,
    pub bytes: u64,
    pub encoded_bytes: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct FailedRequest {
    pub url: String,
    pub reason: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct LargestEntry {
    pub name: String,
    pub url: String,
    pub bytes: u64,
    pub kind: ResourceKind,
}

/// Start-resolution section of the report.
#[derive(Clone, Debug, Serialize)]
pub struct Resolution {
    pub outcome: Outcome,
    pub winning_strategy: Option<StrategyKind>,
    pub attempts: Vec<InteractionAttempt>,
    pub resolver_ms: u64,
    pub new_resources: u64,
}

impl ProbeReport {
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        url: &str,
        run_id: RunId,
        started: Instant,
        navigation_ms: u64,
        log: &ResourceLog,
        start: StartReport,
        settlement: SettleOutcome,
        top_files: usize,
    ) -> Self {
        let totals_by_kind = log.totals_by_kind();
        let by_kind = ResourceKind::REPORT_ORDER
            .iter()
            .filter_map(|kind| {
                totals_by_kind.get(kind).map(|totals| KindBreakdown {
                    kind: *kind,
                    label: kind.label(),
                    count: totals.count,
                    bytes: totals.bytes,
                    encoded_bytes: totals.encoded_bytes,
                })
            })
            .collect();

        let failed = log
            .failed()
            .into_iter()
            .map(|record| FailedRequest {
                url: record.url,
                reason: record.failure.unwrap_or_default(),
            })
            .collect();

        let mut successes: Vec<_> = log.records().into_iter().filter(|r| !r.failed()).collect();
        successes.sort_by(|a, b| b.byte_size.cmp(&a.byte_size));
        let largest = successes
            .into_iter()
            .take(top_files)
            .map(|record| LargestEntry {
                name: display_name(&record.url),
                bytes: record.byte_size,
                kind: record.kind,
                url: record.url,
            })
            .collect();

        Self {
            url: url.to_string(),
            run_id,
            generated_at: Utc::now(),
            navigation_ms,
            total_ms: started.elapsed().as_millis() as u64,
            total_resources: log.current_count(),
            total_bytes: log.total_bytes(),
            total_encoded_bytes: log.total_encoded_bytes(),
            from_cache: log.from_cache_count(),
            degraded_measurements: log.degraded_count(),
            by_kind,
            failed,
            largest,
            resolution: Resolution {
                outcome: start.outcome,
                winning_strategy: start.winning_strategy,
                new_resources: start.delta(),
                resolver_ms: start.latency_ms as u64,
                attempts: start.attempts,
            },
            settlement,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Plain-text summary in the shape consumers print to a console.
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Game URL: {}\n\n", self.url));

        out.push_str("Resources by Type:\n");
        for row in &self.by_kind {
            out.push_str(&format!(
                "  {:<12} {:>4} files | {:>12}\n",
                row.label,
                row.count,
                format_bytes(row.bytes)
            ));
        }
        out.push_str(&format!(
            "\nTotal:       {:>4} files | {:>12}\n",
            self.total_resources,
            format_bytes(self.total_bytes)
        ));
        out.push_str(&format!(
            "Transferred: {} (after compression)\n",
            format_bytes(self.total_encoded_bytes)
        ));
        out.push_str(&format!("From cache:  {} resources\n", self.from_cache));

        out.push_str("\nLoading Timeline:\n");
        out.push_str(&format!(
            "  Navigation:         {}\n",
            format_duration(self.navigation_ms)
        ));
        out.push_str(&format!(
            "  Total loading time: {}\n",
            format_duration(self.total_ms)
        ));

        out.push_str(&format!(
            "\nStart resolution: {:?}",
            self.resolution.outcome
        ));
        if let Some(strategy) = self.resolution.winning_strategy {
            out.push_str(&format!(" via {}", strategy.label()));
        }
        out.push_str(&format!(
            " ({} new resources)\n",
            self.resolution.new_resources
        ));
        out.push_str(&format!("Settlement: {:?}\n", self.settlement));

        if !self.failed.is_empty() {
            out.push_str(&format!("\nFailed Requests: {}\n", self.failed.len()));
            for req in self.failed.iter().take(10) {
                out.push_str(&format!("  {} ({})\n", req.url, req.reason));
            }
            if self.failed.len() > 10 {
                out.push_str(&format!("  ... and {} more\n", self.failed.len() - 10));
            }
        }

        if !self.largest.is_empty() {
            out.push_str(&format!("\nTop {} Largest Files:\n", self.largest.len()));
            for (index, entry) in self.largest.iter().enumerate() {
                out.push_str(&format!(
                    "  {:>2}. {:<50} {:>12} ({})\n",
                    index + 1,
                    entry.name,
                    format_bytes(entry.bytes),
                    entry.kind.label()
                ));
            }
        }

        out
    }
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{} ms", ms)
    } else {
        format!("{:.2} s", ms as f64 / 1000.0)
    }
}

/// Last path segment without the query string, trimmed for display.
fn display_name(url: &str) -> String {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let path = &url[..end];
    let name = match path.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => path,
    };
    if name.len() > DISPLAY_NAME_MAX {
        let mut trimmed: String = name.chars().take(DISPLAY_NAME_MAX - 3).collect();
        trimmed.push_str("...");
        trimmed
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvasprobe_core_types::RunId;
    use resource_observer::{FailureEvidence, ResponseEvidence};

    fn seeded_log() -> ResourceLog {
        let log = ResourceLog::new();
        log.record_response(ResponseEvidence {
            url: "https://cdn.example/game/bundle.js".into(),
            status: Some(200),
            decoded_body_len: Some(2_000_000),
            transfer_len: Some(600_000),
            ..ResponseEvidence::default()
        });
        log.record_response(ResponseEvidence {
            url: "https://cdn.example/art/bg.png?v=2".into(),
            status: Some(200),
            decoded_body_len: Some(500_000),
            transfer_len: Some(500_000),
            from_cache: true,
            ..ResponseEvidence::default()
        });
        log.record_failure(FailureEvidence {
            url: "https://cdn.example/snd/bgm.mp3".into(),
            reason: "net::ERR_ABORTED".into(),
        });
        log
    }

    fn start_report() -> StartReport {
        let mut report = StartReport::new(Instant::now(), 0);
        report.outcome = Outcome::Confirmed;
        report.winning_strategy = Some(StrategyKind::MultiPositionCanvas);
        report.count_after = 5;
        report
    }

    #[test]
    fn format_bytes_thresholds() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1_536), "1.50 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn format_duration_thresholds() {
        assert_eq!(format_duration(999), "999 ms");
        assert_eq!(format_duration(1_000), "1.00 s");
        assert_eq!(format_duration(21_500), "21.50 s");
    }

    #[test]
    fn display_name_strips_path_and_query() {
        assert_eq!(
            display_name("https://cdn.example/a/b/bundle.js?v=3"),
            "bundle.js"
        );
        let long = format!("https://cdn.example/{}.png", "x".repeat(80));
        let name = display_name(&long);
        assert_eq!(name.len(), DISPLAY_NAME_MAX);
        assert!(name.ends_with("..."));
    }

    #[test]
    fn assemble_orders_kinds_and_collects_failures() {
        let log = seeded_log();
        let report = ProbeReport::assemble(
            "https://game.example/play",
            RunId::new(),
            Instant::now(),
            1_200,
            &log,
            start_report(),
            SettleOutcome::Settled,
            10,
        );

        assert_eq!(report.total_resources, 3);
        assert_eq!(report.total_bytes, 2_500_000);
        assert_eq!(report.from_cache, 1);
        // Stable report order: JavaScript before Image.
        let labels: Vec<_> = report.by_kind.iter().map(|row| row.label).collect();
        assert_eq!(labels, vec!["JavaScript", "Image"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].reason, "net::ERR_ABORTED");
        assert_eq!(report.largest[0].name, "bundle.js");
        assert_eq!(report.resolution.outcome, Outcome::Confirmed);
    }

    #[test]
    fn summary_and_json_render() {
        let log = seeded_log();
        let report = ProbeReport::assemble(
            "https://game.example/play",
            RunId::new(),
            Instant::now(),
            1_200,
            &log,
            start_report(),
            SettleOutcome::Settled,
            10,
        );

        let summary = report.render_summary();
        assert!(summary.contains("Resources by Type:"));
        assert!(summary.contains("JavaScript"));
        assert!(summary.contains("Failed Requests: 1"));
        assert!(summary.contains("via multi-position-canvas"));

        let json = report.to_json().unwrap();
        assert!(json.contains("\"total_resources\": 3"));
        assert!(json.contains("\"settlement\": \"Settled\""));
    }
}

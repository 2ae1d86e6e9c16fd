// src/report/render.rs
use crate::dispatch::RunResult;
use crate::probe::{serialize_secs, ProbeStatus};
use crate::report::DistributionSummary;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// One line of the per-request listing. `index` starts at 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRecord<'a> {
    pub index: usize,
    pub target: &'a str,
    pub status: &'a ProbeStatus,
    #[serde(rename = "latency_secs", serialize_with = "serialize_secs")]
    pub latency: Duration,
    pub body_excerpt: &'a str,
}

pub fn details(result: &RunResult) -> Vec<DetailRecord<'_>> {
    result
        .outcomes()
        .iter()
        .enumerate()
        .map(|(i, outcome)| DetailRecord {
            index: i + 1,
            target: &outcome.target,
            status: &outcome.status,
            latency: outcome.latency,
            body_excerpt: &outcome.body_excerpt,
        })
        .collect()
}

/// Per-request listing, in probe order.
pub struct DetailListing<'a>(pub &'a RunResult);

impl fmt::Display for DetailListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Detailed access pattern:")?;
        for record in details(self.0) {
            writeln!(f, "Request {:2}: Backend: {}", record.index, record.target)?;
            writeln!(f, "    Status: {}", record.status)?;
            writeln!(f, "    Response Time: {:.4}s", record.latency.as_secs_f64())?;
            writeln!(f, "    Content: {}...", record.body_excerpt)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Per-backend shares followed by run totals.
pub struct SummaryView<'a>(pub &'a DistributionSummary);

impl fmt::Display for SummaryView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        writeln!(f, "Backend distribution summary:")?;
        for share in &summary.per_target {
            write!(
                f,
                "  {}: {} requests ({:.2}%)",
                share.target, share.count, share.percentage
            )?;
            if share.failures > 0 {
                write!(f, ", {} failed", share.failures)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "\nTotal Requests: {}", summary.total_requests)?;
        writeln!(
            f,
            "Average Response Time: {:.4}s",
            summary.average_latency.as_secs_f64()
        )
    }
}

pub fn render_details(result: &RunResult) -> String {
    DetailListing(result).to_string()
}

pub fn render_summary(summary: &DistributionSummary) -> String {
    SummaryView(summary).to_string()
}

/// Machine-readable form of a run, for JSON or YAML output.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    pub duration: Duration,
    pub requests: Vec<DetailRecord<'a>>,
    /// Absent for a run with zero requests.
    pub summary: Option<&'a DistributionSummary>,
}

impl<'a> RunReport<'a> {
    pub fn new(result: &'a RunResult, summary: Option<&'a DistributionSummary>) -> Self {
        Self {
            run_id: result.run_id,
            started_at: result.started_at,
            duration: result.elapsed,
            requests: details(result),
            summary,
        }
    }
}

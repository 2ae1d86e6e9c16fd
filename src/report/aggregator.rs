// src/report/aggregator.rs
use crate::dispatch::RunResult;
use crate::probe::serialize_secs;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("Cannot summarize a run with zero requests")]
    EmptyRun,
}

/// Traffic share of one backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetShare {
    pub target: String,
    pub count: usize,
    pub percentage: f64,
    /// Ticks on this target that ended in a transport failure.
    pub failures: usize,
    #[serde(rename = "average_latency_secs", serialize_with = "serialize_secs")]
    pub average_latency: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSummary {
    pub per_target: Vec<TargetShare>,
    pub total_requests: usize,
    #[serde(rename = "average_latency_secs", serialize_with = "serialize_secs")]
    pub average_latency: Duration,
}

impl DistributionSummary {
    pub fn get(&self, target: &str) -> Option<&TargetShare> {
        self.per_target.iter().find(|share| share.target == target)
    }

    pub fn count(&self, target: &str) -> usize {
        self.get(target).map_or(0, |share| share.count)
    }
}

struct Tally {
    target: String,
    count: usize,
    failures: usize,
    latency: Duration,
}

/// Per-backend counts, shares and latencies of a completed run.
///
/// Every entry of `known_backends` is reported, including those that got no
/// traffic. Targets missing from `known_backends` are appended in the order
/// they were first seen.
pub fn summarize(result: &RunResult, known_backends: &[String]) -> Result<DistributionSummary, ReportError> {
    let total_requests = result.len();
    if total_requests == 0 {
        return Err(ReportError::EmptyRun);
    }

    // One row per identity, even if the known list repeats one.
    let mut tallies: Vec<Tally> = Vec::with_capacity(known_backends.len());
    for target in known_backends {
        if !tallies.iter().any(|t| &t.target == target) {
            tallies.push(Tally {
                target: target.clone(),
                count: 0,
                failures: 0,
                latency: Duration::ZERO,
            });
        }
    }
    let mut total_latency = Duration::ZERO;

    for outcome in result.outcomes() {
        let index = match tallies.iter().position(|t| t.target == outcome.target) {
            Some(index) => index,
            None => {
                tallies.push(Tally {
                    target: outcome.target.clone(),
                    count: 0,
                    failures: 0,
                    latency: Duration::ZERO,
                });
                tallies.len() - 1
            }
        };

        let tally = &mut tallies[index];
        tally.count += 1;
        tally.latency += outcome.latency;
        if !outcome.status.is_success() {
            tally.failures += 1;
        }
        total_latency += outcome.latency;
    }

    let per_target = tallies
        .into_iter()
        .map(|tally| TargetShare {
            percentage: tally.count as f64 / total_requests as f64 * 100.0,
            average_latency: mean(tally.latency, tally.count),
            target: tally.target,
            count: tally.count,
            failures: tally.failures,
        })
        .collect();

    Ok(DistributionSummary {
        per_target,
        total_requests,
        average_latency: mean(total_latency, total_requests),
    })
}

fn mean(total: Duration, count: usize) -> Duration {
    if count == 0 {
        return Duration::ZERO;
    }
    Duration::from_nanos((total.as_nanos() / count as u128) as u64)
}

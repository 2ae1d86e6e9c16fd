// src/dispatch/dispatcher.rs
use crate::dispatch::{BackendSet, RoundRobinCycle};
use crate::metrics::MetricsCollector;
use crate::probe::{Endpoint, Probe, ProbeOutcome};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

/// Ordered outcomes of one run, one per tick.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    outcomes: Vec<ProbeOutcome>,
}

impl RunResult {
    pub fn new(outcomes: Vec<ProbeOutcome>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            elapsed: Duration::ZERO,
            outcomes,
        }
    }

    pub fn outcomes(&self) -> &[ProbeOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Targets in the order they were probed.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().map(|o| o.target.as_str())
    }
}

/// Drives a run: one probe per tick, strictly in sequence.
pub struct Dispatcher {
    probe: Arc<dyn Probe>,
    endpoint: Endpoint,
    timeout: Duration,
    metrics: Option<Arc<MetricsCollector>>,
}

impl Dispatcher {
    pub fn new(probe: Arc<dyn Probe>, endpoint: Endpoint, timeout: Duration) -> Self {
        Self {
            probe,
            endpoint,
            timeout,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Issues `request_count` probes, cycling through `backends` from the
    /// first entry. A failed probe still consumes its tick.
    pub async fn run(&self, backends: &BackendSet, request_count: usize) -> RunResult {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = Instant::now();

        info!(
            %run_id,
            endpoint = %self.endpoint,
            backends = backends.len(),
            request_count,
            probe = self.probe.name(),
            "Starting round-robin run"
        );

        if let Some(metrics) = &self.metrics {
            metrics.update_backend_count(backends.len());
        }

        let mut cycle = RoundRobinCycle::new(backends);
        let mut outcomes = Vec::with_capacity(request_count);

        for tick in 0..request_count {
            let target = cycle.select_backend();
            let outcome = self.probe.probe(&self.endpoint, target, self.timeout).await;

            debug!(
                tick = tick + 1,
                %target,
                status = %outcome.status,
                latency = ?outcome.latency,
                "Probe recorded"
            );

            if let Some(metrics) = &self.metrics {
                metrics.record_outcome(&outcome);
            }
            outcomes.push(outcome);
        }

        let elapsed = start.elapsed();
        info!(
            %run_id,
            requests = outcomes.len(),
            "Round-robin run completed in {:.2} seconds",
            elapsed.as_secs_f64()
        );

        RunResult {
            run_id,
            started_at,
            elapsed,
            outcomes,
        }
    }
}

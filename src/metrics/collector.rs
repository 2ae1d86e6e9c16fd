// src/metrics/collector.rs
use crate::probe::{ProbeOutcome, ProbeStatus};
use anyhow::Result;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    /// Prometheus text exposition of everything recorded so far.
    pub fn gather(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

pub struct MetricsCollector {
    pub requests_total: IntCounterVec,
    pub request_duration_seconds: HistogramVec,
    pub responses_total: IntCounterVec,
    pub backends: IntGauge,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let requests_total = IntCounterVec::new(
            Opts::new("probe_requests_total", "Total number of probes sent"),
            &["backend", "outcome"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("probe_duration_seconds", "Probe latency in seconds"),
            &["backend"],
        )?;
        registry.register(Box::new(request_duration_seconds.clone()))?;

        let responses_total = IntCounterVec::new(
            Opts::new("probe_responses_total", "Responses received, by status code"),
            &["backend", "status_code"],
        )?;
        registry.register(Box::new(responses_total.clone()))?;

        let backends = IntGauge::new("probe_backends", "Number of backends in the cycle")?;
        registry.register(Box::new(backends.clone()))?;

        Ok(Self {
            requests_total,
            request_duration_seconds,
            responses_total,
            backends,
        })
    }

    pub fn record_outcome(&self, outcome: &ProbeOutcome) {
        let label = if outcome.status.is_success() {
            "success"
        } else {
            "failure"
        };
        self.requests_total
            .with_label_values(&[outcome.target.as_str(), label])
            .inc();

        self.request_duration_seconds
            .with_label_values(&[outcome.target.as_str()])
            .observe(outcome.latency.as_secs_f64());

        if let ProbeStatus::Success { code } = outcome.status {
            self.responses_total
                .with_label_values(&[outcome.target.as_str(), code.to_string().as_str()])
                .inc();
        }
    }

    pub fn update_backend_count(&self, count: usize) {
        self.backends.set(count as i64);
    }
}

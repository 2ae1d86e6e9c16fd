// tests/round_robin_tests.rs
use async_trait::async_trait;
use ingress_probe::dispatch::{BackendSet, Dispatcher};
use ingress_probe::probe::{Endpoint, HttpProbe, Probe, ProbeOutcome, ProbeStatus};
use ingress_probe::report::{self, ReportError};
use ingress_probe::config::ProbeSettings;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Transport-fails for the listed targets, answers 200 for everyone else.
struct ScriptedProbe {
    failing: HashSet<String>,
    latency: Duration,
}

impl ScriptedProbe {
    fn healthy() -> Self {
        Self {
            failing: HashSet::new(),
            latency: Duration::from_millis(10),
        }
    }

    fn failing(targets: &[&str]) -> Self {
        Self {
            failing: targets.iter().map(|t| t.to_string()).collect(),
            latency: Duration::from_millis(10),
        }
    }
}

#[async_trait]
impl Probe for ScriptedProbe {
    async fn probe(&self, _endpoint: &Endpoint, target: &str, _limit: Duration) -> ProbeOutcome {
        if self.failing.contains(target) {
            ProbeOutcome::failure(target, "connection refused", self.latency)
        } else {
            ProbeOutcome::success(target, 200, "ok", 100, self.latency)
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Fails every probe.
struct BrokenProbe;

#[async_trait]
impl Probe for BrokenProbe {
    async fn probe(&self, _endpoint: &Endpoint, target: &str, limit: Duration) -> ProbeOutcome {
        ProbeOutcome::failure(target, format!("request timed out after {:?}", limit), limit)
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

fn dispatcher(probe: impl Probe + 'static) -> Dispatcher {
    Dispatcher::new(
        Arc::new(probe),
        Endpoint::new("localhost", 8080),
        Duration::from_secs(5),
    )
}

fn backend_set(ids: &[&str]) -> BackendSet {
    BackendSet::new(ids.iter().copied()).unwrap()
}

#[tokio::test]
async fn test_cycle_matches_index_mod_len() {
    let dispatcher = dispatcher(ScriptedProbe::healthy());

    for k in 1..=4 {
        let ids: Vec<String> = (0..k).map(|i| format!("pod-{}", i)).collect();
        let set = BackendSet::new(ids.clone()).unwrap();

        for n in [0, 1, k, k + 1, 3 * k + 2] {
            let result = dispatcher.run(&set, n).await;
            let expected: Vec<&str> = (0..n).map(|i| ids[i % k].as_str()).collect();
            assert_eq!(result.targets().collect::<Vec<_>>(), expected, "k={} n={}", k, n);
            assert_eq!(result.len(), n);
        }
    }
}

#[tokio::test]
async fn test_three_pods_seven_requests() {
    let set = backend_set(&["pod-a", "pod-b", "pod-c"]);
    let result = dispatcher(ScriptedProbe::healthy()).run(&set, 7).await;

    assert_eq!(
        result.targets().collect::<Vec<_>>(),
        vec!["pod-a", "pod-b", "pod-c", "pod-a", "pod-b", "pod-c", "pod-a"]
    );

    let summary = report::summarize(&result, &set).unwrap();
    assert_eq!(summary.total_requests, 7);
    assert_eq!(summary.count("pod-a"), 3);
    assert_eq!(summary.count("pod-b"), 2);
    assert_eq!(summary.count("pod-c"), 2);
    assert_eq!(format!("{:.2}", summary.get("pod-a").unwrap().percentage), "42.86");
    assert_eq!(format!("{:.2}", summary.get("pod-b").unwrap().percentage), "28.57");
    assert_eq!(format!("{:.2}", summary.get("pod-c").unwrap().percentage), "28.57");

    let text = report::render_summary(&summary);
    assert!(text.contains("pod-a: 3 requests (42.86%)"));
}

#[tokio::test]
async fn test_failing_backend_still_counted() {
    let set = backend_set(&["pod-a", "pod-b"]);
    let result = dispatcher(ScriptedProbe::failing(&["pod-b"])).run(&set, 4).await;

    let kinds: Vec<bool> = result.outcomes().iter().map(|o| o.status.is_success()).collect();
    assert_eq!(kinds, vec![true, false, true, false]);

    let summary = report::summarize(&result, &set).unwrap();
    assert_eq!(summary.count("pod-a"), 2);
    assert_eq!(summary.count("pod-b"), 2);
    assert_eq!(summary.get("pod-b").unwrap().failures, 2);
    // failed ticks contribute their elapsed time
    assert_eq!(summary.average_latency, Duration::from_millis(10));
}

#[tokio::test]
async fn test_all_failures_never_abort() {
    let set = backend_set(&["pod-a", "pod-b", "pod-c"]);
    let result = dispatcher(BrokenProbe).run(&set, 10).await;

    assert_eq!(result.len(), 10);
    assert!(result
        .outcomes()
        .iter()
        .all(|o| matches!(o.status, ProbeStatus::Failure { .. })));

    let summary = report::summarize(&result, &set).unwrap();
    let total: usize = summary.per_target.iter().map(|s| s.count).sum();
    assert_eq!(total, summary.total_requests);
}

#[tokio::test]
async fn test_summary_counts_sum_to_total() {
    let set = backend_set(&["pod-a", "pod-b", "pod-c", "pod-d"]);
    for n in [1, 5, 13, 40] {
        let result = dispatcher(ScriptedProbe::failing(&["pod-c"])).run(&set, n).await;
        let summary = report::summarize(&result, &set).unwrap();

        let total: usize = summary.per_target.iter().map(|s| s.count).sum();
        assert_eq!(total, n);
        let percent: f64 = summary.per_target.iter().map(|s| s.percentage).sum();
        assert!((percent - 100.0).abs() < 1e-9);
    }
}

#[tokio::test]
async fn test_zero_run_cannot_be_summarized() {
    let set = backend_set(&["pod-a"]);
    let result = dispatcher(ScriptedProbe::healthy()).run(&set, 0).await;

    assert!(result.is_empty());
    assert_eq!(report::summarize(&result, &set), Err(ReportError::EmptyRun));
    assert!(report::details(&result).is_empty());
}

#[tokio::test]
async fn test_http_run_through_single_entry_point() {
    let mut server = mockito::Server::new_async().await;
    let pod_a = server
        .mock("GET", "/")
        .match_header("x-backend", "pod-a")
        .with_status(200)
        .with_body("served by pod-a")
        .expect(2)
        .create_async()
        .await;
    let pod_b = server
        .mock("GET", "/")
        .match_header("x-backend", "pod-b")
        .with_status(500)
        .with_body("pod-b is sick")
        .expect(1)
        .create_async()
        .await;

    let host_with_port = server.host_with_port();
    let (host, port) = host_with_port.rsplit_once(':').unwrap();
    let settings = ProbeSettings {
        routing_header: "X-Backend".to_string(),
        ..ProbeSettings::default()
    };
    let dispatcher = Dispatcher::new(
        Arc::new(HttpProbe::new(&settings).unwrap()),
        Endpoint::new(host, port.parse().unwrap()),
        settings.timeout(),
    );

    let set = backend_set(&["pod-a", "pod-b"]);
    let result = dispatcher.run(&set, 3).await;

    pod_a.assert_async().await;
    pod_b.assert_async().await;

    let statuses: Vec<Option<u16>> = result.outcomes().iter().map(|o| o.status.code()).collect();
    assert_eq!(statuses, vec![Some(200), Some(500), Some(200)]);
    assert_eq!(result.outcomes()[1].body_excerpt, "pod-b is sick");

    let summary = report::summarize(&result, &set).unwrap();
    assert_eq!(summary.get("pod-b").unwrap().failures, 0);
}

#[tokio::test]
async fn test_repeated_backend_id_reports_one_row() {
    let set = backend_set(&["pod-a", "pod-a", "pod-b"]);
    let result = dispatcher(ScriptedProbe::healthy()).run(&set, 3).await;

    let summary = report::summarize(&result, &set).unwrap();
    assert_eq!(summary.per_target.len(), 2);
    assert_eq!(summary.count("pod-a"), 2);
    assert_eq!(summary.count("pod-b"), 1);
    assert_eq!(report::render_summary(&summary).matches("pod-a:").count(), 1);
}

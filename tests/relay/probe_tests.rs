/*!
Tests for the concurrent probe runner.

The transports are scripted per composed canary URL: fast success, slow
success, explicit server failure, and a hang that only the runner's own
timeout bound can end.
*/

use std::time::{Duration, Instant};

use corsrelay::probe::{compose_proxied_url, run_all, run_one, ProbeOptions};
use corsrelay::{Endpoint, EndpointRegistry, ProbeStatus};

use crate::common::MockRelayClient;

const CANARY: &str = "https://target.example/page";

fn endpoint(id: &str) -> Endpoint {
    Endpoint {
        id: id.to_string(),
        url_prefix: format!("https://{}.test/?u=", id),
    }
}

fn canary_url(endpoint: &Endpoint) -> String {
    compose_proxied_url(&endpoint.url_prefix, CANARY)
}

fn options(timeout_ms: u32) -> ProbeOptions {
    ProbeOptions {
        canary_url: CANARY.to_string(),
        timeout_ms,
    }
}

#[tokio::test]
async fn test_run_all_classifies_and_keeps_registry_order() {
    let endpoints = vec![
        endpoint("fast"),
        endpoint("slow"),
        endpoint("failing"),
        endpoint("hanging"),
    ];
    let registry =
        EndpointRegistry::new(endpoints.clone(), "fast").expect("valid test registry");

    let mut client = MockRelayClient::new();
    client.respond(&canary_url(&endpoints[0]), 200, "ok");
    client.respond_after(
        &canary_url(&endpoints[1]),
        200,
        "ok",
        Duration::from_millis(50),
    );
    client.respond(&canary_url(&endpoints[2]), 500, "boom");
    client.hang(&canary_url(&endpoints[3]));

    let started = Instant::now();
    let reports = run_all(&registry, &client, &options(200)).await;
    let elapsed = started.elapsed();

    // One report per endpoint, in registry order, despite completion order.
    assert_eq!(reports.len(), 4);
    let ids: Vec<&str> = reports.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["fast", "slow", "failing", "hanging"]);

    assert_eq!(reports[0].status, ProbeStatus::Online);
    assert!(reports[0].succeeded);
    assert_eq!(reports[0].http_status, Some(200));

    assert_eq!(reports[1].status, ProbeStatus::Online);
    assert!(reports[1].elapsed_ms >= 50);

    assert_eq!(reports[2].status, ProbeStatus::Offline);
    assert!(!reports[2].succeeded);
    assert_eq!(reports[2].http_status, Some(500));
    assert!(reports[2].error.is_none());

    assert_eq!(reports[3].status, ProbeStatus::Errored);
    assert_eq!(reports[3].elapsed_ms, 0);
    assert!(reports[3]
        .error
        .as_deref()
        .expect("timeout message")
        .contains("timed out"));

    // The hang is cut off by the runner's bound, not by the transport: the
    // whole run stays within the timeout plus scheduling slack.
    assert!(elapsed < Duration::from_secs(1), "run took {:?}", elapsed);
}

#[tokio::test]
async fn test_run_one_transport_failure_is_errored_with_message() {
    let ep = endpoint("broken");
    let mut client = MockRelayClient::new();
    client.fail(&canary_url(&ep), "dns lookup failed");

    let report = run_one(&ep, &client, &options(200)).await;

    assert_eq!(report.status, ProbeStatus::Errored);
    assert_eq!(report.elapsed_ms, 0);
    assert!(!report.succeeded);
    assert_eq!(report.http_status, None);
    assert_eq!(report.error.as_deref(), Some("dns lookup failed"));
    assert!(!report.checked_at.is_empty());
}

#[tokio::test]
async fn test_run_one_offline_keeps_elapsed() {
    let ep = endpoint("teapot");
    let mut client = MockRelayClient::new();
    client.respond(&canary_url(&ep), 418, "short and stout");

    let report = run_one(&ep, &client, &options(200)).await;

    assert_eq!(report.status, ProbeStatus::Offline);
    assert!(report.elapsed_ms >= 1);
    assert_eq!(report.http_status, Some(418));
}

#[tokio::test]
async fn test_no_retry_within_a_run() {
    let endpoints = vec![endpoint("one"), endpoint("two")];
    let registry = EndpointRegistry::new(endpoints.clone(), "one").expect("valid test registry");

    let mut client = MockRelayClient::new();
    client.fail(&canary_url(&endpoints[0]), "unreachable");
    client.respond(&canary_url(&endpoints[1]), 200, "ok");

    let reports = run_all(&registry, &client, &options(100)).await;
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].status, ProbeStatus::Errored);
    assert_eq!(reports[1].status, ProbeStatus::Online);

    // A failed endpoint is probed exactly once, never again within the run.
    assert_eq!(client.call_count(&canary_url(&endpoints[0])), 1);
    assert_eq!(client.call_count(&canary_url(&endpoints[1])), 1);
}

#[tokio::test]
async fn test_report_serializes_with_wire_status_names() {
    let ep = endpoint("wire");
    let mut client = MockRelayClient::new();
    client.respond(&canary_url(&ep), 200, "ok");

    let report = run_one(&ep, &client, &options(200)).await;
    let value = serde_json::to_value(&report).expect("report serializes");

    assert_eq!(value["status"], "online");
    assert_eq!(value["succeeded"], true);

    client.fail(&canary_url(&ep), "boom");
    let report = run_one(&ep, &client, &options(200)).await;
    let value = serde_json::to_value(&report).expect("report serializes");
    assert_eq!(value["status"], "error");
}

#[test]
fn test_default_options_use_builtin_canary_and_timeout() {
    let options = ProbeOptions::default();
    assert_eq!(options.canary_url, "https://httpbin.org/ip");
    assert_eq!(options.timeout_ms, 5000);

    let custom = ProbeOptions::with_canary("https://other.example/ping");
    assert_eq!(custom.canary_url, "https://other.example/ping");
    assert_eq!(custom.timeout_ms, 5000);
}

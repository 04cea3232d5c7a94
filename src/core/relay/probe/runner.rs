//! Concurrent endpoint probing.
//!
//! Fires one canary fetch per registered endpoint, all at once, and waits
//! for every probe to settle before reporting. A slow or hung endpoint is
//! cut off by the runner's own timeout and cannot delay the run past the
//! bound or displace faster endpoints' positions in the report.

use std::time::Duration;

use futures::future::join_all;
use tokio::time::timeout;

use crate::config::defaults::{DEFAULT_CANARY_URL, DEFAULT_PROBE_TIMEOUT_MS};
use crate::core::relay::probe::client::RelayClient;
use crate::core::relay::probe::url::compose_proxied_url;
use crate::core::relay::registry::{Endpoint, EndpointRegistry};
use crate::core::relay::types::{get_local_timestamp, ProbeReport, ProbeStatus};

/// Probe run configuration
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// Diagnostic URL fetched through every endpoint
    pub canary_url: String,
    /// Per-endpoint timeout in milliseconds, enforced by the runner itself
    pub timeout_ms: u32,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            canary_url: DEFAULT_CANARY_URL.to_string(),
            timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
        }
    }
}

impl ProbeOptions {
    /// Default options with a different canary URL.
    pub fn with_canary(canary_url: impl Into<String>) -> Self {
        Self {
            canary_url: canary_url.into(),
            ..Self::default()
        }
    }
}

/// Probe one endpoint to a terminal outcome.
///
/// The transport receives the same timeout budget, but the outer
/// `tokio::time::timeout` is what guarantees the bound when a transport
/// ignores its timeout option.
///
/// # Classification
/// - Transport-ok response → `Online`, elapsed recorded
/// - Completed non-ok response → `Offline`, elapsed recorded
/// - Transport failure or timeout → `Errored`, elapsed 0, message captured
pub async fn run_one(
    endpoint: &Endpoint,
    client: &dyn RelayClient,
    options: &ProbeOptions,
) -> ProbeReport {
    let probe_url = compose_proxied_url(&endpoint.url_prefix, &options.canary_url);
    let bound = Duration::from_millis(options.timeout_ms as u64);

    let outcome = timeout(bound, client.fetch(probe_url, options.timeout_ms)).await;
    let checked_at = get_local_timestamp();

    match outcome {
        Ok(Ok(response)) if response.ok => ProbeReport {
            id: endpoint.id.clone(),
            status: ProbeStatus::Online,
            elapsed_ms: response.duration.as_millis() as u64,
            succeeded: true,
            error: None,
            http_status: Some(response.status),
            checked_at,
        },
        Ok(Ok(response)) => ProbeReport {
            id: endpoint.id.clone(),
            status: ProbeStatus::Offline,
            elapsed_ms: response.duration.as_millis() as u64,
            succeeded: false,
            error: None,
            http_status: Some(response.status),
            checked_at,
        },
        Ok(Err(message)) => ProbeReport {
            id: endpoint.id.clone(),
            status: ProbeStatus::Errored,
            elapsed_ms: 0,
            succeeded: false,
            error: Some(message),
            http_status: None,
            checked_at,
        },
        Err(_) => ProbeReport {
            id: endpoint.id.clone(),
            status: ProbeStatus::Errored,
            elapsed_ms: 0,
            succeeded: false,
            error: Some(format!("probe timed out after {}ms", options.timeout_ms)),
            http_status: None,
            checked_at,
        },
    }
}

/// Probe every registered endpoint concurrently.
///
/// Returns exactly one report per endpoint, in registry order, after all
/// probes have settled. No endpoint is retried within a run.
///
/// # Arguments
/// * `registry` - Endpoint table to probe
/// * `client` - Injected transport, shared by all probes
/// * `options` - Canary URL and timeout bound
pub async fn run_all(
    registry: &EndpointRegistry,
    client: &dyn RelayClient,
    options: &ProbeOptions,
) -> Vec<ProbeReport> {
    tracing::debug!(
        "probing {} endpoints with {}ms bound",
        registry.len(),
        options.timeout_ms
    );

    let probes = registry
        .endpoints()
        .iter()
        .map(|endpoint| run_one(endpoint, client, options));

    // join_all preserves input order, so reports come back in registry
    // order no matter which probe settles first.
    let reports = join_all(probes).await;

    let online = reports
        .iter()
        .filter(|report| report.status == ProbeStatus::Online)
        .count();
    tracing::debug!("probe run complete: {}/{} online", online, reports.len());

    reports
}

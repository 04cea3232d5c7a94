// Core types for relay routing and endpoint probing
use crate::core::relay::store::StoreError;

/// Outcome classification for one endpoint probe
///
/// Each endpoint moves from pending to exactly one terminal outcome within a
/// probe run; there are no retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProbeStatus {
    /// Transport reported a successful response
    #[serde(rename = "online")]
    Online,
    /// Transport completed but the response was not successful
    #[serde(rename = "offline")]
    Offline,
    /// Transport failed or the probe hit its timeout bound
    #[serde(rename = "error")]
    Errored,
}

/// Result of probing a single endpoint
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ProbeReport {
    /// Registry id of the probed endpoint
    pub id: String,
    /// Terminal outcome of the probe
    pub status: ProbeStatus,
    /// Round-trip time in milliseconds; 0 when the transport never responded
    pub elapsed_ms: u64,
    /// Convenience flag, true iff `status == Online`
    pub succeeded: bool,
    /// Transport error message when `status == Errored`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// HTTP status code when a response was received
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    /// Local timezone ISO-8601 timestamp of the probe
    pub checked_at: String,
}

/// Relay errors surfaced to callers
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("settings store error: {0}")]
    Store(#[from] StoreError),
}

/// Local timezone ISO-8601 timestamp for probe reports.
///
/// Every [`ProbeReport::checked_at`] goes through this helper so host UIs
/// can show when an endpoint was last checked without doing their own clock
/// math, e.g. `"2025-01-25T10:30:45-08:00"`.
pub fn get_local_timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}

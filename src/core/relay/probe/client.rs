//! Transport seam for relayed fetches and health probes.
//!
//! The relay never owns a network stack. Hosts inject a [`RelayClient`]
//! implementation; the `network-client` feature provides an isahc-backed
//! one for native hosts.

use std::time::Duration;
#[cfg(feature = "network-client")]
use std::time::Instant;

#[cfg(feature = "network-client")]
use crate::core::relay::types::RelayError;

#[cfg(feature = "network-client")]
use isahc::config::{Configurable, RedirectPolicy};
#[cfg(feature = "network-client")]
use isahc::{AsyncReadResponseExt, HttpClient, Request};

/// Response surface the relay needs from a transport
#[derive(Debug, Clone)]
pub struct RelayResponse {
    /// Whether the transport classified the response as successful (2xx)
    pub ok: bool,
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Vec<u8>,
    /// Request round-trip time
    pub duration: Duration,
}

/// Injected fetch capability
///
/// Used identically by the session's pass-through fetch and by the health
/// probe's canary fetch.
#[async_trait::async_trait]
pub trait RelayClient: Send + Sync {
    /// Execute a GET request against a fully composed relay URL.
    ///
    /// # Arguments
    /// * `url` - Complete outgoing URL (prefix + encoded target)
    /// * `timeout_ms` - Requested timeout; transports that cannot enforce a
    ///   timeout may ignore it, the probe runner imposes its own bound
    ///
    /// # Returns
    /// * `Ok(RelayResponse)` - A response was received, successful or not
    /// * `Err(String)` - Transport-level failure (connect, DNS, timeout)
    ///
    /// # Implementation Requirements
    /// * Must use GET method
    /// * Must not follow redirects (a 3xx answer is a completed non-ok
    ///   response, never `ok`)
    async fn fetch(&self, url: String, timeout_ms: u32) -> Result<RelayResponse, String>;
}

/// Production transport implementation using isahc
#[cfg(feature = "network-client")]
pub struct IsahcRelayClient {
    client: HttpClient,
}

#[cfg(feature = "network-client")]
#[async_trait::async_trait]
impl RelayClient for IsahcRelayClient {
    async fn fetch(&self, url: String, timeout_ms: u32) -> Result<RelayResponse, String> {
        let start = Instant::now();

        let request = Request::get(&url)
            .timeout(Duration::from_millis(timeout_ms as u64))
            .redirect_policy(RedirectPolicy::None) // Critical: Don't follow redirects
            .header("Accept", "*/*")
            .body(Vec::new())
            .map_err(|err| format!("request creation failed: {}", err))?;

        let mut response = self
            .client
            .send_async(request)
            .await
            .map_err(|err| format!("request failed: {}", err))?;

        let ok = response.status().is_success();
        let status = response.status().as_u16();

        let body = response
            .bytes()
            .await
            .map_err(|err| format!("failed to read response body: {}", err))?
            .to_vec();

        Ok(RelayResponse {
            ok,
            status,
            body,
            duration: start.elapsed(),
        })
    }
}

#[cfg(feature = "network-client")]
impl IsahcRelayClient {
    pub fn new() -> Result<Self, RelayError> {
        let client = HttpClient::builder()
            .redirect_policy(RedirectPolicy::None) // Global redirect policy
            .build()
            .map_err(|err| RelayError::Transport(format!("failed to create HTTP client: {}", err)))?;
        Ok(Self { client })
    }
}

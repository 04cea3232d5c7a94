//! Endpoint Health Probing Module
//!
//! This module tests every registered forwarding endpoint with:
//! - One canary fetch per endpoint, all fired concurrently
//! - A runner-enforced timeout bound, independent of transport support
//! - Terminal online / offline / errored classification per endpoint
//! - Reports in registry order regardless of completion order

pub mod client;
pub mod runner;
pub mod url;

// Re-export public API
pub use client::{RelayClient, RelayResponse};
pub use runner::{run_all, run_one, ProbeOptions};
pub use url::{compose_proxied_url, encode_target};

// Re-export client implementations conditionally
#[cfg(feature = "network-client")]
pub use client::IsahcRelayClient;

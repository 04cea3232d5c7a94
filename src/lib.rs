/*!
corsrelay - CORS forwarding endpoint selection with health probing and a
bounded page cache.

The crate is an embedded library for clients that route their requests
through public CORS forwarders. It owns two pieces of policy:

- **Page cache**: a bounded mapping from source URL to fetched content with
  FIFO eviction and age-based expiry ([`PageCache`]).
- **Health probing**: one canary fetch per registered endpoint, fired
  concurrently with a runner-enforced timeout bound ([`probe::run_all`]).

Everything with a side effect is injected: the network transport is a
[`RelayClient`] implementation, durable storage is a [`SettingsStore`]
implementation, and time is a [`Clock`]. Hosts construct a [`RelaySession`],
which ties the endpoint registry, the selection, and the cache together.

The `network-client` feature (on by default) provides an isahc-backed
[`probe::IsahcRelayClient`] transport; with the feature disabled, hosts must
bring their own.
*/

pub mod config;
pub mod core;

pub use crate::core::relay::cache::{CachedPage, Clock, PageCache, SystemClock};
pub use crate::core::relay::probe::{self, ProbeOptions, RelayClient, RelayResponse};
pub use crate::core::relay::registry::{Endpoint, EndpointRegistry, RegistryError};
pub use crate::core::relay::session::RelaySession;
pub use crate::core::relay::store::{FileStore, MemoryStore, SettingsStore, StoreError};
pub use crate::core::relay::types::{ProbeReport, ProbeStatus, RelayError};

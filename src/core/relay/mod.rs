//! Relay core: endpoint registry, bounded page cache, health probing, and
//! the session that ties them together.
//!
//! Control flow: [`session::RelaySession::build_url`] resolves the selected
//! endpoint through [`registry::EndpointRegistry`] and composes the outgoing
//! URL; cached fetches go through [`cache::PageCache`]; [`probe::run_all`]
//! is invoked independently by hosts and never touches the cache.

pub mod cache;
pub mod probe;
pub mod registry;
pub mod session;
pub mod store;
pub mod types;

// Re-export commonly used items
pub use cache::{CachedPage, Clock, PageCache, SystemClock};
pub use registry::{Endpoint, EndpointRegistry, RegistryError};
pub use session::RelaySession;
pub use store::{FileStore, MemoryStore, SettingsStore, StoreError};
pub use types::{ProbeReport, ProbeStatus, RelayError};

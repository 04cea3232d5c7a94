/*!
Relay session: endpoint selection, URL building, cached fetches, and
settings persistence.

The session is the single logical owner of mutable relay state. It holds
the currently selected endpoint id and the page cache, builds outgoing
URLs through the registry, and persists/restores its state wholesale
through the injected settings store.

## Persistence Keys

- `"proxy"` - selected endpoint id, raw string
- `"proxy_cache"` - page cache, JSON array of `[key, entry]` pairs

## Ownership

Hosts construct the session explicitly and inject the settings store;
nothing here is a process-wide singleton. The probe subsystem never goes
through the session and never touches the cache.
*/

use crate::core::relay::cache::{Clock, PageCache};
use crate::core::relay::probe::client::RelayClient;
use crate::core::relay::probe::url::compose_proxied_url;
use crate::core::relay::registry::EndpointRegistry;
use crate::core::relay::store::{SettingsStore, StoreError};
use crate::core::relay::types::RelayError;

/// Persistence key for the selected endpoint id
pub const SELECTED_ENDPOINT_KEY: &str = "proxy";
/// Persistence key for the serialized page cache
pub const PAGE_CACHE_KEY: &str = "proxy_cache";

/// Relay state owner: selected endpoint, page cache, settings persistence
pub struct RelaySession {
    registry: EndpointRegistry,
    store: Box<dyn SettingsStore>,
    selected: String,
    cache: PageCache,
}

impl RelaySession {
    /// Create a session starting at the registry's default endpoint with an
    /// empty cache. Call [`Self::load`] to restore persisted state.
    pub fn new(registry: EndpointRegistry, store: Box<dyn SettingsStore>) -> Self {
        let selected = registry.default_id().to_string();
        Self {
            registry,
            store,
            selected,
            cache: PageCache::new(),
        }
    }

    /// Configure the session with a custom cache (for testing)
    pub fn with_cache(mut self, cache: PageCache) -> Self {
        self.cache = cache;
        self
    }

    /// Configure the session's cache with a custom clock (for testing)
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.cache = std::mem::take(&mut self.cache).with_clock(clock);
        self
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    /// Currently selected endpoint id.
    pub fn selected_id(&self) -> &str {
        &self.selected
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut PageCache {
        &mut self.cache
    }

    /// Switch to another registered endpoint.
    ///
    /// Fails with [`RelayError::UnknownEndpoint`] for unregistered ids and
    /// leaves the previous selection unchanged.
    pub fn select(&mut self, id: &str) -> Result<(), RelayError> {
        if !self.registry.contains(id) {
            return Err(RelayError::UnknownEndpoint(id.to_string()));
        }
        self.selected = id.to_string();
        Ok(())
    }

    /// Compose the outgoing URL for a target through the selected endpoint.
    ///
    /// The defensive resolve also covers the unreachable case of a selection
    /// that no longer resolves; [`Self::select`] validates on the way in.
    pub fn build_url(&self, target: &str) -> Result<String, RelayError> {
        let prefix = self.registry.resolve(&self.selected)?;
        Ok(compose_proxied_url(prefix, target))
    }

    /// Fetch a target through the cache and the selected endpoint.
    ///
    /// A fresh cache entry is returned without touching the network. On a
    /// miss the composed URL is fetched through the injected transport;
    /// successful bodies are cached under the target URL. Transport
    /// failures and non-ok responses surface as [`RelayError::Transport`]
    /// and leave the cache unchanged.
    pub async fn fetch_through_cache(
        &mut self,
        client: &dyn RelayClient,
        target: &str,
        timeout_ms: u32,
    ) -> Result<String, RelayError> {
        if let Some(content) = self.cache.get(target) {
            tracing::debug!("cache hit for {}", target);
            return Ok(content.to_string());
        }

        let url = self.build_url(target)?;
        let response = client
            .fetch(url, timeout_ms)
            .await
            .map_err(RelayError::Transport)?;

        if !response.ok {
            return Err(RelayError::Transport(format!(
                "endpoint returned HTTP {}",
                response.status
            )));
        }

        let content = String::from_utf8_lossy(&response.body).into_owned();
        self.cache.put(target, content.clone());
        Ok(content)
    }

    /// Persist the selected endpoint id and the full cache through the
    /// settings store, under their two fixed keys.
    pub fn save(&self) -> Result<(), RelayError> {
        self.store.set(SELECTED_ENDPOINT_KEY, &self.selected)?;

        let encoded = self
            .cache
            .to_json()
            .map_err(|err| StoreError::Write(format!("cache encoding failed: {}", err)))?;
        self.store.set(PAGE_CACHE_KEY, &encoded)?;

        Ok(())
    }

    /// Restore session state from the settings store.
    ///
    /// A missing or unregistered persisted id falls back to the registry
    /// default; missing or malformed cache data yields an empty cache
    /// without failing the load. Only store I/O errors surface.
    pub fn load(&mut self) -> Result<(), RelayError> {
        match self.store.get(SELECTED_ENDPOINT_KEY)? {
            Some(id) if self.registry.contains(&id) => self.selected = id,
            Some(id) => {
                tracing::warn!(
                    "persisted endpoint {:?} is not registered, falling back to {}",
                    id,
                    self.registry.default_id()
                );
                self.selected = self.registry.default_id().to_string();
            }
            None => self.selected = self.registry.default_id().to_string(),
        }

        match self.store.get(PAGE_CACHE_KEY)? {
            Some(raw) => self.cache.from_json(&raw),
            None => self.cache.clear(),
        }

        Ok(())
    }
}

//! Fixed table of forwarding endpoints.
//!
//! The endpoint set is configuration, validated once at construction and
//! immutable afterwards. Lookups never mutate and the id order is the
//! registration order.

use std::collections::HashSet;

use url::Url;

use crate::config::defaults;
use crate::core::relay::probe::url::compose_proxied_url;
use crate::core::relay::types::RelayError;

/// One configured forwarding target
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Endpoint {
    /// Unique identifier, e.g. "allorigins"
    pub id: String,
    /// URL prefix the percent-encoded target is appended to
    pub url_prefix: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate endpoint id: {0}")]
    DuplicateId(String),
    #[error("endpoint {0} has an empty url prefix")]
    EmptyPrefix(String),
    #[error("endpoint {id} prefix does not compose into a valid url: {source}")]
    InvalidPrefix {
        id: String,
        source: url::ParseError,
    },
    #[error("default endpoint id is not registered: {0}")]
    UnknownDefault(String),
}

/// Validated, immutable endpoint table
#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    endpoints: Vec<Endpoint>,
    default_id: String,
}

impl EndpointRegistry {
    /// Build a registry from an endpoint list and the id to fall back to
    /// when no persisted selection exists.
    ///
    /// Validates that ids are unique, prefixes are non-empty and compose
    /// into syntactically valid URLs, and that `default_id` is registered.
    pub fn new(
        endpoints: Vec<Endpoint>,
        default_id: impl Into<String>,
    ) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for endpoint in &endpoints {
            if !seen.insert(endpoint.id.as_str()) {
                return Err(RegistryError::DuplicateId(endpoint.id.clone()));
            }
            if endpoint.url_prefix.is_empty() {
                return Err(RegistryError::EmptyPrefix(endpoint.id.clone()));
            }
            let composed = compose_proxied_url(&endpoint.url_prefix, "https://example.com/");
            Url::parse(&composed).map_err(|source| RegistryError::InvalidPrefix {
                id: endpoint.id.clone(),
                source,
            })?;
        }

        let default_id = default_id.into();
        if !endpoints.iter().any(|endpoint| endpoint.id == default_id) {
            return Err(RegistryError::UnknownDefault(default_id));
        }

        Ok(Self {
            endpoints,
            default_id,
        })
    }

    /// The built-in five-forwarder table from [`crate::config::defaults`].
    pub fn builtin() -> Self {
        // The built-in table is validated by the registry test suite, so the
        // checks in new() are not repeated here.
        Self {
            endpoints: defaults::builtin_endpoints(),
            default_id: defaults::DEFAULT_ENDPOINT_ID.to_string(),
        }
    }

    /// Resolve an endpoint id to its URL prefix.
    pub fn resolve(&self, id: &str) -> Result<&str, RelayError> {
        self.endpoints
            .iter()
            .find(|endpoint| endpoint.id == id)
            .map(|endpoint| endpoint.url_prefix.as_str())
            .ok_or_else(|| RelayError::UnknownEndpoint(id.to_string()))
    }

    /// Endpoint ids in registration order.
    pub fn list_ids(&self) -> impl Iterator<Item = &str> {
        self.endpoints.iter().map(|endpoint| endpoint.id.as_str())
    }

    /// Full endpoint records in registration order, for host UIs.
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn contains(&self, id: &str) -> bool {
        self.endpoints.iter().any(|endpoint| endpoint.id == id)
    }

    /// Fallback id used when a persisted selection is missing or unknown.
    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

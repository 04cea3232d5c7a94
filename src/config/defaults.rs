//! Built-in forwarding endpoint table and relay constants.

use crate::core::relay::registry::Endpoint;

/// Endpoint selected when no persisted selection exists
pub const DEFAULT_ENDPOINT_ID: &str = "cors-anywhere";

/// Diagnostic URL fetched through every endpoint during health probes
pub const DEFAULT_CANARY_URL: &str = "https://httpbin.org/ip";

/// Per-endpoint probe timeout in milliseconds
pub const DEFAULT_PROBE_TIMEOUT_MS: u32 = 5000;

/// The documented public CORS forwarders, in presentation order.
///
/// Each prefix is composed with a percent-encoded target URL appended
/// directly, so query-style prefixes keep their trailing `=` or `?`.
pub fn builtin_endpoints() -> Vec<Endpoint> {
    [
        ("cors-anywhere", "https://cors-anywhere.herokuapp.com/"),
        ("allorigins", "https://api.allorigins.win/raw?url="),
        ("corsproxy", "https://corsproxy.io/?"),
        ("thingproxy", "https://thingproxy.freeboard.io/fetch/"),
        ("codetabs", "https://api.codetabs.com/v1/proxy?quest="),
    ]
    .into_iter()
    .map(|(id, url_prefix)| Endpoint {
        id: id.to_string(),
        url_prefix: url_prefix.to_string(),
    })
    .collect()
}
